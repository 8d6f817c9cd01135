use crate::error::{QuantumError, Result};
use faer::{Mat, Side};
use tn::mps::C64;

/// Entries closer than this to their mirrored conjugate count as equal.
pub const HERMITIAN_TOL: f64 = 1e-9;

/// Dense square operator on `log2(dim)` qubits, row-major. Basis index bit
/// `q` is qubit `q`.
#[derive(Clone, Debug, PartialEq)]
pub struct Hamiltonian {
    dim: usize,
    data: Vec<C64>,
}

impl Hamiltonian {
    /// Model two-qubit system whose ground state the pipeline estimates.
    pub fn two_qubit_model() -> Self {
        let rows = [
            [-1.06365335, 0.0, 0.0, 0.1809312],
            [0.0, -1.83696799, 0.1809312, 0.0],
            [0.0, 0.1809312, -0.24521829, 0.0],
            [0.1809312, 0.0, 0.0, -1.06365335],
        ];
        Self {
            dim: 4,
            data: rows
                .iter()
                .flat_map(|r| r.iter().map(|&v| C64::new(v, 0.0)))
                .collect(),
        }
    }

    /// Build from real rows. The shape must be square with a power-of-two
    /// side; Hermiticity is checked separately by the decomposition.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(QuantumError::NotPowerOfTwo(dim));
        }
        let mut data = Vec::with_capacity(dim * dim);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != dim {
                return Err(QuantumError::NotSquare {
                    row,
                    len: r.len(),
                    expected: dim,
                });
            }
            data.extend(r.iter().map(|&v| C64::new(v, 0.0)));
        }
        Ok(Self { dim, data })
    }

    /// Parse a JSON array of rows, e.g. `[[1, 0], [0, -1]]`.
    pub fn from_json(text: &str) -> Result<Self> {
        let rows: Vec<Vec<f64>> = serde_json::from_str(text)?;
        Self::from_rows(rows)
    }

    pub(crate) fn from_complex(dim: usize, data: Vec<C64>) -> Self {
        debug_assert_eq!(data.len(), dim * dim);
        Self { dim, data }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    pub fn get(&self, row: usize, col: usize) -> C64 {
        self.data[row * self.dim + col]
    }

    /// First `(row, col)` with `H[row][col] != conj(H[col][row])`, if any.
    pub fn hermitian_violation(&self, tol: f64) -> Option<(usize, usize)> {
        for row in 0..self.dim {
            for col in row..self.dim {
                if (self.get(row, col) - self.get(col, row).conj()).norm() > tol {
                    return Some((row, col));
                }
            }
        }
        None
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.hermitian_violation(tol).is_none()
    }

    /// Eigenvalues by classical diagonalization, ascending.
    pub fn eigenvalues(&self) -> Result<Vec<f64>> {
        if let Some((row, col)) = self.hermitian_violation(HERMITIAN_TOL) {
            return Err(QuantumError::NotHermitian { row, col });
        }
        let m = Mat::<C64>::from_fn(self.dim, self.dim, |i, j| self.get(i, j));
        let mut eig: Vec<f64> = m.selfadjoint_eigenvalues(Side::Lower);
        eig.sort_by(|a, b| a.total_cmp(b));
        Ok(eig)
    }

    pub fn ground_energy(&self) -> Result<f64> {
        Ok(self.eigenvalues()?[0])
    }

    /// Largest entrywise distance to `other`; infinite on a shape mismatch.
    pub fn max_abs_diff(&self, other: &Hamiltonian) -> f64 {
        if self.dim != other.dim {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn model_is_symmetric() {
        let h = Hamiltonian::two_qubit_model();
        assert_eq!(h.num_qubits(), 2);
        assert!(h.is_hermitian(0.0));
    }

    #[test]
    fn model_spectrum_matches_block_diagonalization() {
        let (a, b, d, c) = (-1.06365335, -1.83696799, -0.24521829, 0.1809312);
        let mean = (b + d) / 2.0;
        let half = ((b - d) / 2.0_f64).hypot(c);
        let mut expected = vec![a - c, a + c, mean - half, mean + half];
        expected.sort_by(|x, y| x.total_cmp(y));

        let eig = Hamiltonian::two_qubit_model().eigenvalues().unwrap();
        for (e, x) in eig.iter().zip(&expected) {
            assert_abs_diff_eq!(*e, *x, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(eig[0], -1.857275, epsilon = 1e-5);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            Hamiltonian::from_rows(vec![vec![1.0; 3]; 3]),
            Err(QuantumError::NotPowerOfTwo(3))
        ));
        assert!(matches!(
            Hamiltonian::from_rows(vec![vec![1.0, 0.0], vec![0.0]]),
            Err(QuantumError::NotSquare { row: 1, .. })
        ));
    }

    #[test]
    fn json_rows_parse() {
        let h = Hamiltonian::from_json("[[1, 0.5], [0.5, -1]]").unwrap();
        assert_eq!(h.dim(), 2);
        assert_abs_diff_eq!(h.get(0, 1).re, 0.5);
        assert!(Hamiltonian::from_json("{\"rows\": 1}").is_err());
    }

    #[test]
    fn asymmetric_matrix_has_no_spectrum() {
        let h = Hamiltonian::from_rows(vec![vec![0.0, 1.0], vec![0.0, 0.0]]).unwrap();
        assert!(matches!(
            h.eigenvalues(),
            Err(QuantumError::NotHermitian { row: 0, col: 1 })
        ));
    }
}
