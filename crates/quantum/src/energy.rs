use crate::error::{QuantumError, Result};
use crate::pauli::{PauliString, SparsePauliOp};
use tn::mps::{C64, MPS};

/// `⟨ψ|P|ψ⟩` for a dense state.
pub fn expectation(state: &[C64], p: &PauliString) -> C64 {
    let mut acc = C64::new(0.0, 0.0);
    for (k, &amp) in state.iter().enumerate() {
        let (j, phase) = p.apply_to_basis(k);
        acc += state[j].conj() * phase * amp;
    }
    acc
}

/// `⟨ψ|H|ψ⟩` for a dense state. Only the real part is returned; it is exact
/// for Hermitian `H`.
pub fn energy_statevector(state: &[C64], op: &SparsePauliOp) -> f64 {
    op.terms()
        .iter()
        .map(|(p, c)| (c * expectation(state, p)).re)
        .sum()
}

/// Exact expectation value `⟨ψ|H|ψ⟩`.
pub fn energy(psi: &MPS, op: &SparsePauliOp) -> Result<f64> {
    if psi.num_qubits() != op.num_qubits() {
        return Err(QuantumError::QubitMismatch {
            operator: op.num_qubits(),
            state: psi.num_qubits(),
        });
    }
    Ok(energy_statevector(&psi.to_statevector(), op))
}
