use crate::gates::{hadamard, sdg};
use crate::pauli::Pauli;
use rng::ONDRng;
use tn::mps::MPS;

/// Rotate so that a Z readout of qubit `q` measures `basis[q]`.
pub fn rotate_to_basis(psi: &mut MPS, basis: &[Pauli]) {
    for (q, &p) in basis.iter().enumerate() {
        match p {
            Pauli::X => psi.apply_1q(q, hadamard()),
            Pauli::Y => {
                psi.apply_1q(q, sdg());
                psi.apply_1q(q, hadamard());
            }
            Pauli::I | Pauli::Z => {}
        }
    }
}

/// Born probabilities of every computational basis outcome.
pub fn probabilities(psi: &MPS) -> Vec<f64> {
    psi.to_statevector().iter().map(|a| a.norm_sqr()).collect()
}

/// Draw `shots` outcomes from `probs` and tally them per outcome.
pub fn sample_counts(probs: &[f64], rng: &mut ONDRng, shots: usize) -> Vec<usize> {
    let mut counts = vec![0usize; probs.len()];
    let total: f64 = probs.iter().sum();
    if total == 0.0 || probs.is_empty() {
        return counts;
    }
    let last = probs.iter().rposition(|&p| p > 0.0).unwrap_or(0);

    for _ in 0..shots {
        let mut x = rng.next_f64(b"SHOT") * total;
        let mut outcome = last;
        for (idx, p) in probs.iter().enumerate() {
            if x < *p {
                outcome = idx;
                break;
            }
            x -= *p;
        }
        counts[outcome] += 1;
    }

    counts
}
