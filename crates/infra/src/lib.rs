//! Infrastructure layer: directory adapters and configuration loading.

pub mod config;
pub mod directory;


pub use config::{ConfigError, DirectorySnapshot};
pub use directory::{DirectoryMutationError, InMemoryDirectory};
