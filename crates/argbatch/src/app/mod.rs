//! Application layer: partitioning strategies over domain types and infrastructure.

pub mod directory;
pub mod packages;
pub mod partition;
pub mod render;
pub mod resolver;
pub mod size;
