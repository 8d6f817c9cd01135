use crate::measurement::{probabilities, rotate_to_basis, sample_counts};
use crate::pauli::MeasurementGroup;
use rng::ONDRng;
use tn::mps::MPS;

fn parity_sign(outcome: usize, support: usize) -> f64 {
    if (outcome & support).count_ones() % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

fn mean_parity(counts: &[usize], support: usize, shots: usize) -> f64 {
    let sum: f64 = counts
        .iter()
        .enumerate()
        .map(|(outcome, &n)| n as f64 * parity_sign(outcome, support))
        .sum();
    sum / shots as f64
}

/// Estimate the group's weighted sum from one sampled distribution in the
/// group's shared basis. Identity terms contribute their coefficient exactly.
pub fn estimate_group(
    psi: &MPS,
    group: &MeasurementGroup,
    rng: &mut ONDRng,
    shots: usize,
) -> f64 {
    let mut e = 0.0;
    let mut measured = Vec::new();
    for (p, c) in group.terms() {
        if p.is_identity() {
            e += c.re;
        } else {
            measured.push((p.support_mask(), c.re));
        }
    }
    if measured.is_empty() || shots == 0 {
        return e;
    }

    let mut rotated = psi.clone();
    rotate_to_basis(&mut rotated, group.basis());
    let counts = sample_counts(&probabilities(&rotated), rng, shots);

    for (support, c) in measured {
        e += c * mean_parity(&counts, support, shots);
    }
    e
}
