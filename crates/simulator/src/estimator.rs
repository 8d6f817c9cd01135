use crate::error::{Result, SimError};
use quantum::{
    circuit::Circuit,
    energy::energy,
    pauli::{MeasurementGroup, SparsePauliOp},
    shot_estimator::estimate_group,
};
use rayon::prelude::*;
use rng::ONDRng;
use tn::truncation::Truncation;

/// Expectation-value evaluator for a bound ansatz.
///
/// With shots, each qubit-wise commuting group of the operator is sampled
/// once. The RNG is reseeded on every call from `seed` and the group index,
/// so the estimate is a deterministic function of the parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimator {
    pub shots: Option<usize>,
    pub seed: u64,
    pub trunc: Truncation,
}

impl Default for Estimator {
    fn default() -> Self {
        Self {
            shots: Some(2048),
            seed: 28,
            trunc: Truncation::exact(),
        }
    }
}

impl Estimator {
    pub fn sampled(shots: usize, seed: u64) -> Self {
        Self {
            shots: Some(shots),
            seed,
            ..Self::default()
        }
    }

    /// Noiseless: exact expectation values from the state vector.
    pub fn exact() -> Self {
        Self {
            shots: None,
            ..Self::default()
        }
    }

    pub fn with_truncation(mut self, trunc: Truncation) -> Self {
        self.trunc = trunc;
        self
    }

    pub fn estimate(&self, ansatz: &Circuit, op: &SparsePauliOp, params: &[f64]) -> Result<f64> {
        self.estimate_grouped(ansatz, op, &op.qubitwise_groups(), params)
    }

    /// As [`Estimator::estimate`], with the measurement groups of `op`
    /// computed once by the caller.
    pub fn estimate_grouped(
        &self,
        ansatz: &Circuit,
        op: &SparsePauliOp,
        groups: &[MeasurementGroup],
        params: &[f64],
    ) -> Result<f64> {
        if ansatz.num_qubits() != op.num_qubits() {
            return Err(SimError::QubitMismatch {
                operator: op.num_qubits(),
                ansatz: ansatz.num_qubits(),
            });
        }

        let psi = ansatz.simulate(params, self.trunc)?;
        let shots = match self.shots {
            None => return Ok(energy(&psi, op)?),
            Some(shots) => shots,
        };

        let parts: Vec<f64> = groups
            .par_iter()
            .enumerate()
            .map(|(g, group)| {
                let seed_str = format!("{}-group-{}", self.seed, g);
                let mut rng = ONDRng::new(seed_str.as_bytes());
                estimate_group(&psi, group, &mut rng, shots)
            })
            .collect();

        let mut total = 0.0;
        for e in parts {
            total += e;
        }
        Ok(total)
    }
}
