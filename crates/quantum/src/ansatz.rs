use crate::circuit::Circuit;
use crate::error::Result;

/// Pairs of qubits joined by CX in each entangling layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entanglement {
    /// `(0,1), (1,2), …`
    Linear,
    /// `(n-2,n-1), …, (0,1)`
    ReverseLinear,
}

impl Entanglement {
    fn pairs(self, num_qubits: usize) -> Vec<(usize, usize)> {
        let forward = (0..num_qubits.saturating_sub(1)).map(|i| (i, i + 1));
        match self {
            Entanglement::Linear => forward.collect(),
            Entanglement::ReverseLinear => forward.rev().collect(),
        }
    }
}

/// Hardware-efficient SU(2) ansatz: alternating RY/RZ rotation layers and CX
/// entangling layers.
#[derive(Clone, Debug, PartialEq)]
pub struct EfficientSu2 {
    pub num_qubits: usize,
    pub reps: usize,
    pub entanglement: Entanglement,
    pub skip_final_rotation_layer: bool,
}

impl EfficientSu2 {
    pub fn new(num_qubits: usize, reps: usize) -> Self {
        Self {
            num_qubits,
            reps,
            entanglement: Entanglement::Linear,
            skip_final_rotation_layer: false,
        }
    }

    pub fn with_entanglement(mut self, entanglement: Entanglement) -> Self {
        self.entanglement = entanglement;
        self
    }

    pub fn skip_final_rotation_layer(mut self, skip: bool) -> Self {
        self.skip_final_rotation_layer = skip;
        self
    }

    fn rotation_layers(&self) -> usize {
        self.reps + usize::from(!self.skip_final_rotation_layer)
    }

    pub fn num_parameters(&self) -> usize {
        2 * self.num_qubits * self.rotation_layers()
    }

    pub fn build(&self) -> Result<Circuit> {
        let mut c = Circuit::new(self.num_qubits);
        let pairs = self.entanglement.pairs(self.num_qubits);

        for layer in 0..self.rotation_layers() {
            for q in 0..self.num_qubits {
                c.ry(q)?;
            }
            for q in 0..self.num_qubits {
                c.rz(q)?;
            }
            if layer < self.reps {
                for &(control, target) in &pairs {
                    c.cx(control, target)?;
                }
            }
        }

        Ok(c)
    }
}
