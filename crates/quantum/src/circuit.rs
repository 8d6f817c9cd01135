use crate::error::{QuantumError, Result};
use crate::gates::{cnot, cnot_reversed, ry, rz};
use tn::{mps::MPS, truncation::Truncation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// RY by the bound parameter at index `param`.
    Ry { qubit: usize, param: usize },
    /// RZ by the bound parameter at index `param`.
    Rz { qubit: usize, param: usize },
    Cx { control: usize, target: usize },
    Barrier,
    Measure { qubit: usize, clbit: usize },
}

/// Parameterized circuit template. Angles are bound at simulation time.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    num_parameters: usize,
    instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits: 0,
            num_parameters: 0,
            instructions: Vec::new(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn num_parameters(&self) -> usize {
        self.num_parameters
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(QuantumError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Append an RY with a fresh parameter; returns the parameter index.
    pub fn ry(&mut self, qubit: usize) -> Result<usize> {
        self.check_qubit(qubit)?;
        let param = self.num_parameters;
        self.num_parameters += 1;
        self.instructions.push(Instruction::Ry { qubit, param });
        Ok(param)
    }

    /// Append an RZ with a fresh parameter; returns the parameter index.
    pub fn rz(&mut self, qubit: usize) -> Result<usize> {
        self.check_qubit(qubit)?;
        let param = self.num_parameters;
        self.num_parameters += 1;
        self.instructions.push(Instruction::Rz { qubit, param });
        Ok(param)
    }

    pub fn cx(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control.abs_diff(target) != 1 {
            return Err(QuantumError::NonAdjacent { control, target });
        }
        self.instructions.push(Instruction::Cx { control, target });
        Ok(())
    }

    pub fn barrier(&mut self) {
        self.instructions.push(Instruction::Barrier);
    }

    /// Barrier, one classical bit per qubit, and a measurement of every qubit
    /// into its own bit.
    pub fn measure_all(&mut self) {
        self.barrier();
        let first = self.num_clbits;
        self.num_clbits += self.num_qubits;
        for qubit in 0..self.num_qubits {
            self.instructions.push(Instruction::Measure {
                qubit,
                clbit: first + qubit,
            });
        }
    }

    pub fn has_measurements(&self) -> bool {
        self.instructions
            .iter()
            .any(|i| matches!(i, Instruction::Measure { .. }))
    }

    /// Bind `params` and evolve `|0…0⟩`.
    pub fn simulate(&self, params: &[f64], trunc: Truncation) -> Result<MPS> {
        if params.len() != self.num_parameters {
            return Err(QuantumError::ParameterCount {
                expected: self.num_parameters,
                got: params.len(),
            });
        }
        if self.has_measurements() {
            return Err(QuantumError::NonUnitary);
        }

        let mut psi = MPS::new_zero(self.num_qubits);
        for inst in &self.instructions {
            match *inst {
                Instruction::Ry { qubit, param } => psi.apply_1q(qubit, ry(params[param])),
                Instruction::Rz { qubit, param } => psi.apply_1q(qubit, rz(params[param])),
                Instruction::Cx { control, target } if target == control + 1 => {
                    psi.apply_2q_svd(control, cnot(), trunc)
                }
                Instruction::Cx { target, .. } => {
                    psi.apply_2q_svd(target, cnot_reversed(), trunc)
                }
                Instruction::Barrier => {}
                Instruction::Measure { .. } => return Err(QuantumError::NonUnitary),
            }
        }
        Ok(psi)
    }
}
