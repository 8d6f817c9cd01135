/// Bond truncation applied after every two-site gate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Truncation {
    /// Upper bound on the kept bond dimension.
    pub max_bond: usize,
    /// Singular values at or below this are discarded.
    pub cutoff: f64,
}

impl Truncation {
    /// No practical truncation for registers up to a few dozen qubits.
    pub fn exact() -> Self {
        Self {
            max_bond: 1 << 16,
            cutoff: 1e-14,
        }
    }

    /// Number of singular values to keep out of a descending list.
    pub(crate) fn rank(&self, singular_values: &[f64]) -> usize {
        let kept = singular_values
            .iter()
            .take(self.max_bond)
            .take_while(|&&sv| sv > self.cutoff)
            .count();
        kept.max(1)
    }
}

impl Default for Truncation {
    fn default() -> Self {
        Self {
            max_bond: 64,
            cutoff: 1e-12,
        }
    }
}
