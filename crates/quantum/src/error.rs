//! Error type shared by the operator, circuit and estimation modules.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuantumError>;

#[derive(Error, Debug)]
pub enum QuantumError {
    #[error("matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("matrix dimension {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("matrix is not Hermitian: entry ({row}, {col}) differs from the conjugate of ({col}, {row})")]
    NotHermitian { row: usize, col: usize },

    #[error("invalid Pauli label {0:?}")]
    InvalidLabel(String),

    #[error("expected {expected} parameters, got {got}")]
    ParameterCount { expected: usize, got: usize },

    #[error("qubit {qubit} out of range for a {num_qubits}-qubit circuit")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    #[error("CX between qubits {control} and {target} is not nearest-neighbour")]
    NonAdjacent { control: usize, target: usize },

    #[error("circuit contains a measurement and cannot be simulated as a unitary")]
    NonUnitary,

    #[error("operator acts on {operator} qubits but the state has {state}")]
    QubitMismatch { operator: usize, state: usize },

    #[error("failed to parse Hamiltonian: {0}")]
    Json(#[from] serde_json::Error),
}
