//! Variational eigensolver stack: shot-based estimation, derivative-free
//! optimizers, element classification and circuit rendering.

pub mod classify;
pub mod draw;
pub mod error;
pub mod estimator;
mod font;
pub mod optimizer;
pub mod output;
pub mod vqe;

pub use classify::{ElementEnergy, ElementTable};
pub use error::{Result, SimError};
pub use estimator::Estimator;
pub use optimizer::{AnyOptimizer, Cobyla, NelderMead, OptimizationResult, Optimizer};
pub use vqe::{Vqe, VqeResult};
