pub mod ansatz;
pub mod circuit;
pub mod energy;
pub mod energy_shots;
pub mod error;
pub mod gates;
pub mod hamiltonian;
pub mod measurement;
pub mod pauli;
pub mod shot_estimator;

pub use error::{QuantumError, Result};
