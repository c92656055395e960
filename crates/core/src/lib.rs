//! `dirguard-core` — identifiers shared across the workspace.
//!
//! This crate contains **pure** primitives (no directory or transport concerns).

pub mod error;
pub mod id;

pub use error::{IdError, IdResult};
pub use id::{GroupId, UserId};
