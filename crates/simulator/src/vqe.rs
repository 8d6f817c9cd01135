use crate::error::{Result, SimError};
use crate::estimator::Estimator;
use crate::optimizer::Optimizer;
use quantum::{circuit::Circuit, pauli::SparsePauliOp};
use rng::ONDRng;
use std::f64::consts::PI;
use tracing::{debug, info, warn};

/// `n` angles drawn uniformly from `[0, 2π)`.
pub fn random_initial_point(n: usize, rng: &mut ONDRng) -> Vec<f64> {
    (0..n).map(|_| 2.0 * PI * rng.next_unit(b"INIT_POINT")).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct VqeResult {
    pub eigenvalue: f64,
    pub optimal_parameters: Vec<f64>,
    pub cost_function_evals: usize,
    pub converged: bool,
    /// Estimated energy of every evaluation, in order.
    pub history: Vec<f64>,
    pub initial_point: Vec<f64>,
    /// Seed the initial point was drawn from, when it was drawn.
    pub init_seed: Option<String>,
}

/// Variational eigensolver: minimizes the estimated energy of `ansatz` over
/// its parameters.
pub struct Vqe<O: Optimizer> {
    pub estimator: Estimator,
    pub ansatz: Circuit,
    pub optimizer: O,
    pub initial_point: Option<Vec<f64>>,
    pub init_seed: Option<String>,
}

impl<O: Optimizer> Vqe<O> {
    pub fn new(estimator: Estimator, ansatz: Circuit, optimizer: O) -> Self {
        Self {
            estimator,
            ansatz,
            optimizer,
            initial_point: None,
            init_seed: None,
        }
    }

    pub fn with_initial_point(mut self, x0: Vec<f64>) -> Self {
        self.initial_point = Some(x0);
        self
    }

    /// Draw the initial point from `seed` instead of fresh entropy.
    pub fn with_init_seed(mut self, seed: impl Into<String>) -> Self {
        self.init_seed = Some(seed.into());
        self
    }

    fn initial_point(&self) -> Result<(Vec<f64>, Option<String>)> {
        let n = self.ansatz.num_parameters();
        if let Some(x0) = &self.initial_point {
            if x0.len() != n {
                return Err(SimError::InitialPoint {
                    expected: n,
                    got: x0.len(),
                });
            }
            return Ok((x0.clone(), None));
        }

        let (mut rng, seed) = match &self.init_seed {
            Some(seed) => (ONDRng::new(seed.as_bytes()), seed.clone()),
            None => ONDRng::from_entropy(),
        };
        info!(init_seed = %seed, "drawing random initial point");
        Ok((random_initial_point(n, &mut rng), Some(seed)))
    }

    pub fn compute_minimum_eigenvalue(&self, op: &SparsePauliOp) -> Result<VqeResult> {
        if op.num_qubits() != self.ansatz.num_qubits() {
            return Err(SimError::QubitMismatch {
                operator: op.num_qubits(),
                ansatz: self.ansatz.num_qubits(),
            });
        }
        let (x0, init_seed) = self.initial_point()?;
        let groups = op.qubitwise_groups();

        info!(
            optimizer = self.optimizer.name(),
            parameters = x0.len(),
            terms = op.len(),
            groups = groups.len(),
            shots = ?self.estimator.shots,
            "starting VQE"
        );

        let mut evals = 0usize;
        let objective = |params: &[f64]| -> Result<f64> {
            let e = self
                .estimator
                .estimate_grouped(&self.ansatz, op, &groups, params)?;
            evals += 1;
            if evals % 100 == 0 {
                debug!(evals, energy = e, "objective");
            }
            Ok(e)
        };
        let res = self.optimizer.minimize(objective, x0.clone())?;

        if !res.converged {
            warn!(
                nfev = res.nfev,
                "optimizer stopped on its evaluation budget before converging"
            );
        }
        info!(eigenvalue = res.fun, nfev = res.nfev, "VQE finished");

        Ok(VqeResult {
            eigenvalue: res.fun,
            optimal_parameters: res.x,
            cost_function_evals: res.nfev,
            converged: res.converged,
            history: res.history,
            initial_point: x0,
            init_seed,
        })
    }
}
