use crate::error::{QuantumError, Result};
use crate::pauli::SparsePauliOp;
use crate::shot_estimator::estimate_group;
use rng::ONDRng;
use tn::mps::MPS;

/// Estimate `⟨ψ|H|ψ⟩` via shots, one sampled distribution per qubit-wise
/// commuting group, all drawn from `rng` in group order.
pub fn estimate_energy_shots(
    psi: &MPS,
    op: &SparsePauliOp,
    rng: &mut ONDRng,
    shots: usize,
) -> Result<f64> {
    if psi.num_qubits() != op.num_qubits() {
        return Err(QuantumError::QubitMismatch {
            operator: op.num_qubits(),
            state: psi.num_qubits(),
        });
    }

    let mut e = 0.0;
    for group in op.qubitwise_groups() {
        e += estimate_group(psi, &group, rng, shots);
    }
    Ok(e)
}
