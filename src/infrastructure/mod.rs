//! Infrastructure layer: DI container and I/O-level errors
//!
//! This layer wires settings and services together for the CLI.

pub mod di;
pub mod error;

pub use di::ServiceContainer;
pub use error::{InfraError, InfraResult};
