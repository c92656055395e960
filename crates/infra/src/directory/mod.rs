//! Directory adapters implementing `dirguard_auth::DirectoryLookup`.

pub mod in_memory;

pub use in_memory::{DirectoryMutationError, InMemoryDirectory};
