use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Quantum(#[from] quantum::QuantumError),

    #[error("initial point has {got} entries but the ansatz takes {expected} parameters")]
    InitialPoint { expected: usize, got: usize },

    #[error("operator acts on {operator} qubits but the ansatz has {ansatz}")]
    QubitMismatch { operator: usize, ansatz: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),
}
