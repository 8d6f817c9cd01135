use crate::truncation::Truncation;
use faer::Mat;
use num_complex::Complex64;

pub type C64 = Complex64;

/// Rank-3 site tensor indexed `(left bond, physical, right bond)`.
#[derive(Clone, Debug)]
pub struct Tensor3 {
    pub data: Vec<C64>,
    pub dl: usize,
    pub dp: usize,
    pub dr: usize,
}

impl Tensor3 {
    pub fn zeros(dl: usize, dp: usize, dr: usize) -> Self {
        Self {
            data: vec![C64::new(0.0, 0.0); dl * dp * dr],
            dl,
            dp,
            dr,
        }
    }

    #[inline]
    fn idx(&self, l: usize, p: usize, r: usize) -> usize {
        (l * self.dp + p) * self.dr + r
    }

    pub fn get(&self, l: usize, p: usize, r: usize) -> C64 {
        self.data[self.idx(l, p, r)]
    }

    pub fn set(&mut self, l: usize, p: usize, r: usize, v: C64) {
        let i = self.idx(l, p, r);
        self.data[i] = v;
    }
}

/// Open-boundary MPS. Site `k` holds qubit `k`.
#[derive(Clone, Debug)]
pub struct MPS {
    pub sites: Vec<Tensor3>,
}

impl MPS {
    /// `|0…0⟩` on `n` qubits.
    pub fn new_zero(n: usize) -> Self {
        let mut sites = Vec::with_capacity(n);
        for _ in 0..n {
            let mut t = Tensor3::zeros(1, 2, 1);
            t.set(0, 0, 0, C64::new(1.0, 0.0));
            sites.push(t);
        }
        Self { sites }
    }

    pub fn num_qubits(&self) -> usize {
        self.sites.len()
    }

    pub fn apply_1q(&mut self, k: usize, u: [[C64; 2]; 2]) {
        let s = &self.sites[k];
        let mut out = Tensor3::zeros(s.dl, s.dp, s.dr);

        for l in 0..s.dl {
            for r in 0..s.dr {
                for p in 0..2 {
                    let mut acc = C64::new(0.0, 0.0);
                    for pp in 0..2 {
                        acc += u[p][pp] * s.get(l, pp, r);
                    }
                    out.set(l, p, r, acc);
                }
            }
        }
        self.sites[k] = out;
    }

    /// Apply `u` to sites `(k, k + 1)`. Rows and columns of `u` are indexed
    /// `p_k * 2 + p_{k+1}`. The bond is re-split by a thin SVD and truncated.
    pub fn apply_2q_svd(&mut self, k: usize, u: [[C64; 4]; 4], trunc: Truncation) {
        let a = &self.sites[k];
        let b = &self.sites[k + 1];

        let dl = a.dl;
        let dr = b.dr;
        let chi = a.dr;

        let mut theta = Mat::<C64>::zeros(dl * 2, 2 * dr);

        for l in 0..dl {
            for m in 0..chi {
                for r in 0..dr {
                    for p1 in 0..2 {
                        for p2 in 0..2 {
                            let i = p1 * 2 + p2;
                            let mut v = C64::new(0.0, 0.0);
                            for q1 in 0..2 {
                                for q2 in 0..2 {
                                    v += u[i][q1 * 2 + q2] * a.get(l, q1, m) * b.get(m, q2, r);
                                }
                            }
                            let row = l * 2 + p1;
                            let col = p2 * dr + r;
                            let cur = theta.read(row, col);
                            theta.write(row, col, cur + v);
                        }
                    }
                }
            }
        }

        let svd = theta.thin_svd();
        let s = svd.s_diagonal();
        let s_vals: Vec<f64> = (0..s.nrows()).map(|i| s.read(i).re).collect();
        let kept = trunc.rank(&s_vals);

        let u_mat = svd.u();
        let v_mat = svd.v();

        let mut new_a = Tensor3::zeros(dl, 2, kept);
        for l in 0..dl {
            for p in 0..2 {
                for m in 0..kept {
                    new_a.set(l, p, m, u_mat.read(l * 2 + p, m) * s_vals[m]);
                }
            }
        }

        let mut new_b = Tensor3::zeros(kept, 2, dr);
        for m in 0..kept {
            for p in 0..2 {
                for r in 0..dr {
                    new_b.set(m, p, r, v_mat.read(p * dr + r, m).conj());
                }
            }
        }

        self.sites[k] = new_a;
        self.sites[k + 1] = new_b;
    }

    /// Contract the chain into `2^n` amplitudes. Qubit `q` is bit `q` of the
    /// basis index.
    pub fn to_statevector(&self) -> Vec<C64> {
        let zero = C64::new(0.0, 0.0);
        let mut acc = vec![C64::new(1.0, 0.0)];
        let mut prefix = 1usize;
        let mut bond = 1usize;

        for s in &self.sites {
            let mut next = vec![zero; prefix * s.dp * s.dr];
            for idx in 0..prefix {
                for p in 0..s.dp {
                    for r in 0..s.dr {
                        let mut v = zero;
                        for l in 0..s.dl {
                            v += acc[idx * bond + l] * s.get(l, p, r);
                        }
                        next[(idx + p * prefix) * s.dr + r] = v;
                    }
                }
            }
            acc = next;
            prefix *= s.dp;
            bond = s.dr;
        }

        acc
    }

    /// `⟨ψ|ψ⟩`.
    pub fn norm_sqr(&self) -> f64 {
        self.to_statevector().iter().map(|a| a.norm_sqr()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{C64, MPS};
    use crate::truncation::Truncation;
    use approx::assert_abs_diff_eq;

    fn hadamard() -> [[C64; 2]; 2] {
        let s = C64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        [[s, s], [s, -s]]
    }

    fn cnot() -> [[C64; 4]; 4] {
        let z = C64::new(0.0, 0.0);
        let o = C64::new(1.0, 0.0);
        [[o, z, z, z], [z, o, z, z], [z, z, z, o], [z, z, o, z]]
    }

    #[test]
    fn zero_state_statevector() {
        let psi = MPS::new_zero(3);
        let sv = psi.to_statevector();
        assert_eq!(sv.len(), 8);
        assert_abs_diff_eq!(sv[0].re, 1.0, epsilon = 1e-12);
        assert!(sv[1..].iter().all(|a| a.norm() < 1e-12));
    }

    #[test]
    fn qubit_zero_is_low_bit() {
        let mut psi = MPS::new_zero(2);
        let x = [
            [C64::new(0.0, 0.0), C64::new(1.0, 0.0)],
            [C64::new(1.0, 0.0), C64::new(0.0, 0.0)],
        ];
        psi.apply_1q(0, x);
        let sv = psi.to_statevector();
        assert_abs_diff_eq!(sv[1].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bell_pair_amplitudes() {
        let mut psi = MPS::new_zero(2);
        psi.apply_1q(0, hadamard());
        psi.apply_2q_svd(0, cnot(), Truncation::default());

        let sv = psi.to_statevector();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(sv[0].norm(), h, epsilon = 1e-12);
        assert_abs_diff_eq!(sv[3].norm(), h, epsilon = 1e-12);
        assert!(sv[1].norm() < 1e-12 && sv[2].norm() < 1e-12);
        assert_abs_diff_eq!(psi.norm_sqr(), 1.0, epsilon = 1e-12);
        assert_eq!(psi.sites[0].dr, 2);
    }
}
