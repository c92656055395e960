//! Directory lookup contract consumed by the decision engine.
//!
//! Implementations own transport, timeouts and retries; the engine only
//! awaits them and propagates their failures.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dirguard_core::{GroupId, UserId};

/// Group as referenced from a principal's memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: GroupId,
    pub display_name: String,
}

/// A directory user as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub groups: Vec<GroupRef>,
}

impl Principal {
    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.display_name.clone()).collect()
    }
}

/// A directory group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub display_name: String,
}

/// Failure of the directory collaborator itself (not a denial).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("directory lookup timed out")]
    Timeout,

    #[error("malformed directory response: {0}")]
    Malformed(String),
}

/// Resolve principals and groups. `Ok(None)` means "does not exist".
#[async_trait::async_trait]
pub trait DirectoryLookup: Send + Sync {
    async fn get_principal(&self, id: &UserId) -> Result<Option<Principal>, DirectoryError>;

    async fn get_group(&self, id: &GroupId) -> Result<Option<Group>, DirectoryError>;
}

#[async_trait::async_trait]
impl<D> DirectoryLookup for Arc<D>
where
    D: DirectoryLookup + ?Sized,
{
    async fn get_principal(&self, id: &UserId) -> Result<Option<Principal>, DirectoryError> {
        (**self).get_principal(id).await
    }

    async fn get_group(&self, id: &GroupId) -> Result<Option<Group>, DirectoryError> {
        (**self).get_group(id).await
    }
}
