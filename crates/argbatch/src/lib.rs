pub mod app;
pub mod domain;
pub mod infra;

pub use app::partition::{PartitionOptions, Partitioner};
pub use domain::errors::ResolutionError;
pub use domain::model::{ArgVector, CommandPrefix, Strategy};

pub fn init() {
    infra::logging::init();
}
