use serde::{Deserialize, Serialize};

use dirguard_core::UserId;

use crate::catalog::permissions_of;
use crate::{Permission, Role, RoleMapper};

/// What the optional entity id of a check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// No target entity.
    #[default]
    None,
    /// The entity id is a user id.
    User,
    /// The entity id is a group id.
    Group,
}

/// Request-scoped view of a principal's access.
///
/// Always rebuilt from a fresh directory lookup: memberships can change
/// between requests, and a stale context would grant revoked access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccessContext {
    pub principal_id: UserId,
    pub role: Option<Role>,
    pub permissions: Vec<Permission>,
    pub groups: Vec<String>,
}

impl UserAccessContext {
    pub fn from_groups<M: RoleMapper + ?Sized>(principal_id: UserId, groups: Vec<String>, mapper: &M) -> Self {
        let role = mapper.map_groups_to_role(&groups);
        let permissions = role
            .map(|r| permissions_of(r).iter().copied().collect())
            .unwrap_or_default();

        Self {
            principal_id,
            role,
            permissions,
            groups,
        }
    }

    /// Context of a principal the directory does not know.
    pub fn empty(principal_id: UserId) -> Self {
        Self {
            principal_id,
            role: None,
            permissions: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
