//! Configuration loading: role-mapper overrides and directory snapshots.
//!
//! Reading files or environment variables is left to the embedding
//! application; these helpers take JSON text or any `io::Read`.

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use dirguard_auth::{ConfiguredRoleMapper, RoleMapperConfigError, RoleMapperOverrides, lldap};
use dirguard_core::{GroupId, UserId};

use crate::directory::{DirectoryMutationError, InMemoryDirectory};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid role mapping: {0}")]
    RoleMapper(#[from] RoleMapperConfigError),

    #[error("inconsistent directory snapshot: {0}")]
    Snapshot(#[from] DirectoryMutationError),
}

/// Build an LLDAP role mapper from JSON overrides.
///
/// ```json
/// { "role_groups": { "admin": ["domain_admins"] }, "protected_groups": ["executives"] }
/// ```
pub fn lldap_role_mapper_from_json(json: &str) -> Result<ConfiguredRoleMapper, ConfigError> {
    let overrides: RoleMapperOverrides = serde_json::from_str(json)?;
    build_lldap_mapper(overrides)
}

pub fn lldap_role_mapper_from_reader<R: Read>(reader: R) -> Result<ConfiguredRoleMapper, ConfigError> {
    let overrides: RoleMapperOverrides = serde_json::from_reader(reader)?;
    build_lldap_mapper(overrides)
}

fn build_lldap_mapper(overrides: RoleMapperOverrides) -> Result<ConfiguredRoleMapper, ConfigError> {
    let replaced_roles = overrides.role_groups.len();
    let extra_protected = overrides.protected_groups.len();
    let mapper = lldap::role_mapper_with(overrides)?;
    info!(replaced_roles, extra_protected, "role mapper configured");
    Ok(mapper)
}

/// Serializable directory content, used to seed an [`InMemoryDirectory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub groups: Vec<SnapshotGroup>,
    #[serde(default)]
    pub users: Vec<SnapshotUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotGroup {
    pub id: GroupId,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotUser {
    pub id: UserId,
    #[serde(default)]
    pub groups: Vec<GroupId>,
}

impl DirectorySnapshot {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load into a fresh directory. Memberships must reference listed groups.
    pub fn into_directory(self) -> Result<InMemoryDirectory, ConfigError> {
        let directory = InMemoryDirectory::new();
        for group in self.groups {
            directory.add_group(group.id, group.display_name)?;
        }
        for user in self.users {
            directory.add_user(user.id.clone())?;
            for group in &user.groups {
                directory.add_user_to_group(&user.id, group)?;
            }
        }
        Ok(directory)
    }
}

#[cfg(test)]
mod tests {
    use dirguard_auth::{Role, RoleMapper};

    use super::*;

    #[test]
    fn empty_overrides_give_stock_mapping() {
        let mapper = lldap_role_mapper_from_json("{}").unwrap();
        assert_eq!(
            mapper.map_groups_to_role(&["lldap_admin".to_string()]),
            Some(Role::Admin)
        );
    }

    #[test]
    fn overrides_load_from_reader() {
        let json = br#"{"role_groups": {"password_manager": ["helpdesk"]}, "protected_groups": ["board"]}"#;
        let mapper = lldap_role_mapper_from_reader(&json[..]).unwrap();
        assert_eq!(
            mapper.map_groups_to_role(&["helpdesk".to_string()]),
            Some(Role::PasswordManager)
        );
        assert!(mapper.is_protected_group("board"));
        assert!(mapper.is_protected_group("helpdesk"));
    }

    #[test]
    fn unknown_role_key_is_a_json_error() {
        let err = lldap_role_mapper_from_json(r#"{"role_groups": {"root": ["x"]}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn blank_group_is_a_mapper_error() {
        let err = lldap_role_mapper_from_json(r#"{"protected_groups": [""]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::RoleMapper(RoleMapperConfigError::EmptyProtectedGroup)));
    }

    #[test]
    fn snapshot_with_dangling_membership_is_rejected() {
        let snapshot = DirectorySnapshot::from_json(
            r#"{"groups": [], "users": [{"id": "alice", "groups": ["1"]}]}"#,
        )
        .unwrap();
        let err = snapshot.into_directory().unwrap_err();
        assert!(matches!(err, ConfigError::Snapshot(DirectoryMutationError::UnknownGroup(_))));
    }
}
