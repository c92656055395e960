use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of directory entity a permission is namespaced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Group,
}

/// One guarded directory operation.
///
/// The set is closed and static; string forms (`"user.change_password"`) are
/// what callers and logs see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Permission {
    UserView,
    UserList,
    UserCreate,
    UserEdit,
    UserDelete,
    UserChangePassword,
    UserAddToGroup,
    UserRemoveFromGroup,
    GroupView,
    GroupList,
    GroupCreate,
    GroupEdit,
    GroupDelete,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::UserView,
        Permission::UserList,
        Permission::UserCreate,
        Permission::UserEdit,
        Permission::UserDelete,
        Permission::UserChangePassword,
        Permission::UserAddToGroup,
        Permission::UserRemoveFromGroup,
        Permission::GroupView,
        Permission::GroupList,
        Permission::GroupCreate,
        Permission::GroupEdit,
        Permission::GroupDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UserView => "user.view",
            Permission::UserList => "user.list",
            Permission::UserCreate => "user.create",
            Permission::UserEdit => "user.edit",
            Permission::UserDelete => "user.delete",
            Permission::UserChangePassword => "user.change_password",
            Permission::UserAddToGroup => "user.add_to_group",
            Permission::UserRemoveFromGroup => "user.remove_from_group",
            Permission::GroupView => "group.view",
            Permission::GroupList => "group.list",
            Permission::GroupCreate => "group.create",
            Permission::GroupEdit => "group.edit",
            Permission::GroupDelete => "group.delete",
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Permission::GroupView
            | Permission::GroupList
            | Permission::GroupCreate
            | Permission::GroupEdit
            | Permission::GroupDelete => EntityKind::Group,
            _ => EntityKind::User,
        }
    }

    /// Human-readable description (for audit/display).
    pub fn description(&self) -> &'static str {
        match self {
            Permission::UserView => "View a user's details",
            Permission::UserList => "List users",
            Permission::UserCreate => "Create a user",
            Permission::UserEdit => "Edit a user's attributes",
            Permission::UserDelete => "Delete a user",
            Permission::UserChangePassword => "Change a user's password",
            Permission::UserAddToGroup => "Add a user to a group",
            Permission::UserRemoveFromGroup => "Remove a user from a group",
            Permission::GroupView => "View a group's details",
            Permission::GroupList => "List groups",
            Permission::GroupCreate => "Create a group",
            Permission::GroupEdit => "Rename or edit a group",
            Permission::GroupDelete => "Delete a group",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Permission> for &'static str {
    fn from(value: Permission) -> Self {
        value.as_str()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

impl TryFrom<String> for Permission {
    type Error = UnknownPermission;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
