//! Matrix-product-state register used as the simulator's state backend.

pub mod mps;
pub mod truncation;
