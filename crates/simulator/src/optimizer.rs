//! Derivative-free classical optimizers for the variational loop.
//!
//! Both treat the objective as a noisy black box and count every call
//! against `maxiter`. The starting point is always evaluated, so a zero cap
//! still reports a real objective value.

use faer::Mat;
use tracing::debug;

/// Outcome of a minimization.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationResult {
    /// Best point seen.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Objective evaluations spent.
    pub nfev: usize,
    /// Whether the method's own stopping test fired before the budget ran out.
    pub converged: bool,
    /// Objective value of every evaluation, in order.
    pub history: Vec<f64>,
}

pub trait Optimizer {
    fn name(&self) -> &'static str;

    /// Minimize `objective` from `x0`. An error from the objective aborts the
    /// run and is returned as is.
    fn minimize<F, E>(&self, objective: F, x0: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>;
}

/// Evaluation bookkeeping shared by the optimizers.
struct Budget {
    maxfev: usize,
    history: Vec<f64>,
    best: Option<(Vec<f64>, f64)>,
}

impl Budget {
    fn new(maxfev: usize) -> Self {
        Self {
            maxfev,
            history: Vec::new(),
            best: None,
        }
    }

    fn exhausted(&self) -> bool {
        self.history.len() >= self.maxfev
    }

    fn eval<F, E>(&mut self, objective: &mut F, x: &[f64]) -> Result<f64, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let f = objective(x)?;
        self.history.push(f);
        if self.best.as_ref().map_or(true, |(_, bf)| f < *bf) {
            self.best = Some((x.to_vec(), f));
        }
        Ok(f)
    }

    fn finish(self, x0: Vec<f64>, converged: bool) -> OptimizationResult {
        let (x, fun) = self.best.unwrap_or((x0, f64::INFINITY));
        OptimizationResult {
            x,
            fun,
            nfev: self.history.len(),
            converged,
            history: self.history,
        }
    }
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

fn argmin(v: &[f64]) -> usize {
    (0..v.len())
        .min_by(|&a, &b| v[a].total_cmp(&v[b]))
        .unwrap_or(0)
}

fn argmax(v: &[f64]) -> usize {
    (0..v.len())
        .max_by(|&a, &b| v[a].total_cmp(&v[b]))
        .unwrap_or(0)
}

/// Solve `d · g = rhs` through a thin SVD. Also returns `s_min / s_max` as a
/// measure of how well the simplex spans the space. `None` when `d` is
/// numerically singular.
fn solve_linear(d: &[Vec<f64>], rhs: &[f64]) -> Option<(Vec<f64>, f64)> {
    let n = rhs.len();
    let m = Mat::<f64>::from_fn(n, n, |i, j| d[i][j]);
    let svd = m.thin_svd();
    let s = svd.s_diagonal();
    let u = svd.u();
    let v = svd.v();

    let smax = s.read(0);
    if !(smax > 0.0) || s.read(n - 1) < smax * 1e-10 {
        return None;
    }

    let mut g = vec![0.0; n];
    for k in 0..n {
        let mut proj = 0.0;
        for i in 0..n {
            proj += u.read(i, k) * rhs[i];
        }
        let w = proj / s.read(k);
        for (j, gj) in g.iter_mut().enumerate() {
            *gj += v.read(j, k) * w;
        }
    }
    Some((g, s.read(n - 1) / smax))
}

/// Replace every vertex but the first with an axis step of length `rho`.
/// Returns `false` if the budget ran out part way.
fn rebuild<F, E>(
    budget: &mut Budget,
    objective: &mut F,
    sim: &mut [Vec<f64>],
    fval: &mut [f64],
    rho: f64,
) -> Result<bool, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    for i in 1..sim.len() {
        if budget.exhausted() {
            return Ok(false);
        }
        let mut v = sim[0].clone();
        v[i - 1] += rho;
        fval[i] = budget.eval(objective, &v)?;
        sim[i] = v;
    }
    Ok(true)
}

/// Unconstrained COBYLA: a simplex of `n + 1` points defines a linear model,
/// each iteration steps a distance `rho` down the model gradient, and `rho`
/// is halved towards `tol` when steps stop paying off.
#[derive(Clone, Debug, PartialEq)]
pub struct Cobyla {
    /// Cap on objective evaluations.
    pub maxiter: usize,
    /// Initial trust-region radius.
    pub rhobeg: f64,
    /// Final trust-region radius.
    pub tol: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            rhobeg: 1.0,
            tol: 1e-4,
        }
    }
}

impl Cobyla {
    pub fn new(maxiter: usize) -> Self {
        Self {
            maxiter,
            ..Self::default()
        }
    }

    pub fn with_rhobeg(mut self, rhobeg: f64) -> Self {
        self.rhobeg = rhobeg;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }
}

impl Optimizer for Cobyla {
    fn name(&self) -> &'static str {
        "COBYLA"
    }

    fn minimize<F, E>(&self, mut objective: F, x0: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = x0.len();
        let mut budget = Budget::new(self.maxiter.max(1));

        let f0 = budget.eval(&mut objective, &x0)?;
        if n == 0 {
            return Ok(budget.finish(x0, true));
        }

        let mut rho = self.rhobeg;
        let mut sim = vec![x0.clone()];
        let mut fval = vec![f0];
        for i in 0..n {
            if budget.exhausted() {
                return Ok(budget.finish(x0, false));
            }
            let mut v = x0.clone();
            v[i] += rho;
            fval.push(budget.eval(&mut objective, &v)?);
            sim.push(v);
        }

        loop {
            if budget.exhausted() {
                return Ok(budget.finish(x0, false));
            }

            let best = argmin(&fval);
            sim.swap(0, best);
            fval.swap(0, best);

            let edges: Vec<Vec<f64>> = sim[1..].iter().map(|v| sub(v, &sim[0])).collect();
            let df: Vec<f64> = fval[1..].iter().map(|f| f - fval[0]).collect();

            let (grad, spread) =
                solve_linear(&edges, &df).unwrap_or_else(|| (vec![0.0; n], 0.0));
            if spread == 0.0 {
                debug!(rho, "rebuilding degenerate simplex");
                if !rebuild(&mut budget, &mut objective, &mut sim, &mut fval, rho)? {
                    return Ok(budget.finish(x0, false));
                }
                continue;
            }

            let gnorm = norm(&grad);
            if gnorm > 0.0 {
                let trial: Vec<f64> = sim[0]
                    .iter()
                    .zip(&grad)
                    .map(|(x, g)| x - rho * g / gnorm)
                    .collect();
                let ft = budget.eval(&mut objective, &trial)?;

                let predicted = rho * gnorm;
                let worst = argmax(&fval);
                if fval[0] - ft > 0.1 * predicted {
                    sim[worst] = trial;
                    fval[worst] = ft;
                    continue;
                }
                if ft < fval[worst] && worst != 0 {
                    sim[worst] = trial;
                    fval[worst] = ft;
                }
            }

            // The step failed. Repair the geometry before shrinking rho.
            let (far, far_dist) = (1..=n)
                .map(|i| (i, norm(&sub(&sim[i], &sim[0]))))
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .unwrap_or((1, 0.0));
            if far_dist > 2.0 * rho {
                if budget.exhausted() {
                    return Ok(budget.finish(x0, false));
                }
                let v: Vec<f64> = sim[0]
                    .iter()
                    .zip(&sim[far])
                    .map(|(c, x)| c + rho * (x - c) / far_dist)
                    .collect();
                fval[far] = budget.eval(&mut objective, &v)?;
                sim[far] = v;
                continue;
            }

            if spread < 1e-3 {
                // Flat simplex: refresh the model at this rho first.
                debug!(rho, spread, "rebuilding flat simplex");
                if !rebuild(&mut budget, &mut objective, &mut sim, &mut fval, rho)? {
                    return Ok(budget.finish(x0, false));
                }
                continue;
            }

            if rho <= self.tol {
                return Ok(budget.finish(x0, true));
            }
            rho = if 0.5 * rho <= 1.5 * self.tol {
                self.tol
            } else {
                0.5 * rho
            };
            debug!(rho, nfev = budget.history.len(), "trust region reduced");
        }
    }
}

/// Nelder–Mead simplex search.
#[derive(Clone, Debug, PartialEq)]
pub struct NelderMead {
    /// Cap on objective evaluations.
    pub maxiter: usize,
    /// Converged once every vertex is this close to the best one...
    pub xatol: f64,
    /// ...and every vertex value is this close to the best value.
    pub fatol: f64,
    /// Edge length of the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            xatol: 1e-4,
            fatol: 1e-4,
            initial_step: 0.5,
        }
    }
}

impl NelderMead {
    pub fn new(maxiter: usize) -> Self {
        Self {
            maxiter,
            ..Self::default()
        }
    }
}

impl Optimizer for NelderMead {
    fn name(&self) -> &'static str {
        "Nelder-Mead"
    }

    fn minimize<F, E>(&self, mut objective: F, x0: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = x0.len();
        let mut budget = Budget::new(self.maxiter.max(1));

        let mut sim = vec![x0.clone()];
        let mut fval = vec![budget.eval(&mut objective, &x0)?];
        if n == 0 {
            return Ok(budget.finish(x0, true));
        }
        for i in 0..n {
            if budget.exhausted() {
                return Ok(budget.finish(x0, false));
            }
            let mut v = x0.clone();
            v[i] += self.initial_step;
            fval.push(budget.eval(&mut objective, &v)?);
            sim.push(v);
        }

        loop {
            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| fval[a].total_cmp(&fval[b]));
            sim = order.iter().map(|&i| sim[i].clone()).collect();
            fval = order.iter().map(|&i| fval[i]).collect();

            let x_spread = sim[1..]
                .iter()
                .flat_map(|v| v.iter().zip(&sim[0]).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            let f_spread = fval[1..]
                .iter()
                .map(|f| (f - fval[0]).abs())
                .fold(0.0, f64::max);
            if x_spread <= self.xatol && f_spread <= self.fatol {
                return Ok(budget.finish(x0, true));
            }
            if budget.exhausted() {
                return Ok(budget.finish(x0, false));
            }

            let mut centroid = vec![0.0; n];
            for v in &sim[..n] {
                for (c, x) in centroid.iter_mut().zip(v) {
                    *c += x / n as f64;
                }
            }
            let along = |t: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(&sim[n])
                    .map(|(c, w)| c + t * (w - c))
                    .collect()
            };

            let xr = along(-1.0);
            let fr = budget.eval(&mut objective, &xr)?;

            if fr < fval[0] {
                if budget.exhausted() {
                    sim[n] = xr;
                    fval[n] = fr;
                    continue;
                }
                let xe = along(-2.0);
                let fe = budget.eval(&mut objective, &xe)?;
                if fe < fr {
                    sim[n] = xe;
                    fval[n] = fe;
                } else {
                    sim[n] = xr;
                    fval[n] = fr;
                }
                continue;
            }
            if fr < fval[n - 1] {
                sim[n] = xr;
                fval[n] = fr;
                continue;
            }
            if budget.exhausted() {
                continue;
            }

            let (xc, outside) = if fr < fval[n] {
                (along(-0.5), true)
            } else {
                (along(0.5), false)
            };
            let fc = budget.eval(&mut objective, &xc)?;
            let accept = if outside { fc <= fr } else { fc < fval[n] };
            if accept {
                sim[n] = xc;
                fval[n] = fc;
                continue;
            }

            // Shrink towards the best vertex.
            for i in 1..=n {
                if budget.exhausted() {
                    break;
                }
                let v: Vec<f64> = sim[0]
                    .iter()
                    .zip(&sim[i])
                    .map(|(b, x)| b + 0.5 * (x - b))
                    .collect();
                fval[i] = budget.eval(&mut objective, &v)?;
                sim[i] = v;
            }
        }
    }
}

/// Runtime choice between the two optimizers.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyOptimizer {
    Cobyla(Cobyla),
    NelderMead(NelderMead),
}

impl Optimizer for AnyOptimizer {
    fn name(&self) -> &'static str {
        match self {
            AnyOptimizer::Cobyla(o) => o.name(),
            AnyOptimizer::NelderMead(o) => o.name(),
        }
    }

    fn minimize<F, E>(&self, objective: F, x0: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        match self {
            AnyOptimizer::Cobyla(o) => o.minimize(objective, x0),
            AnyOptimizer::NelderMead(o) => o.minimize(objective, x0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn quadratic(x: &[f64]) -> Result<f64, Infallible> {
        Ok((x[0] - 1.0).powi(2) + 4.0 * (x[1] + 0.5).powi(2) + 0.5)
    }

    fn rosenbrock(x: &[f64]) -> Result<f64, Infallible> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2))
    }

    #[test]
    fn cobyla_finds_quadratic_minimum() {
        let r = Cobyla::new(500).minimize(quadratic, vec![3.0, 2.0]).unwrap();
        assert!(r.converged, "nfev = {}", r.nfev);
        assert!((r.fun - 0.5).abs() < 1e-5, "fun = {}", r.fun);
        assert!((r.x[0] - 1.0).abs() < 5e-3 && (r.x[1] + 0.5).abs() < 5e-3, "x = {:?}", r.x);
        assert_eq!(r.history.len(), r.nfev);
    }

    #[test]
    fn cobyla_respects_evaluation_cap() {
        let r = Cobyla::new(40).minimize(rosenbrock, vec![-1.2, 1.0]).unwrap();
        assert_eq!(r.nfev, 40);
        assert!(!r.converged);
        assert!(r.fun < 24.2, "no progress from f(x0) = 24.2: {}", r.fun);
    }

    #[test]
    fn cobyla_handles_several_parameters() {
        let target: Vec<f64> = (0..6).map(|i| 0.3 * i as f64).collect();
        let f = |x: &[f64]| -> Result<f64, Infallible> {
            Ok(x.iter().zip(&target).map(|(a, b)| (a - b).powi(2)).sum())
        };
        let r = Cobyla::new(2000).minimize(f, vec![0.0; 6]).unwrap();
        assert!(r.fun < 1e-4, "fun = {}", r.fun);
    }

    #[test]
    fn nelder_mead_finds_quadratic_minimum() {
        let r = NelderMead::new(1000).minimize(quadratic, vec![3.0, 2.0]).unwrap();
        assert!(r.converged);
        assert!((r.fun - 0.5).abs() < 1e-4, "fun = {}", r.fun);
    }

    #[test]
    fn nelder_mead_respects_evaluation_cap() {
        let r = NelderMead::new(25).minimize(rosenbrock, vec![-1.2, 1.0]).unwrap();
        assert!(r.nfev <= 25);
        assert!(!r.converged);
    }

    #[test]
    fn zero_cap_still_evaluates_start() {
        for r in [
            Cobyla::new(0).minimize(quadratic, vec![3.0, 2.0]).unwrap(),
            NelderMead::new(0).minimize(quadratic, vec![3.0, 2.0]).unwrap(),
        ] {
            assert_eq!(r.nfev, 1);
            assert_eq!(r.x, vec![3.0, 2.0]);
            assert!((r.fun - 29.5).abs() < 1e-12, "fun = {}", r.fun);
            assert!(!r.converged);
        }
    }

    #[test]
    fn objective_errors_abort() {
        let mut calls = 0;
        let f = |_: &[f64]| -> Result<f64, &'static str> {
            calls += 1;
            if calls == 3 {
                Err("boom")
            } else {
                Ok(0.0)
            }
        };
        assert_eq!(Cobyla::new(100).minimize(f, vec![0.0, 0.0]), Err("boom"));
    }

    #[test]
    fn dispatch_keeps_names() {
        assert_eq!(AnyOptimizer::Cobyla(Cobyla::default()).name(), "COBYLA");
        assert_eq!(AnyOptimizer::NelderMead(NelderMead::default()).name(), "Nelder-Mead");
    }
}
