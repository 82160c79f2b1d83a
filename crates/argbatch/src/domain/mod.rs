//! Core types shared by every partitioning strategy.

pub mod errors;
pub mod model;
