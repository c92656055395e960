use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Privilege tier derived from directory group membership.
///
/// Variants are declared lowest first, so the derived `Ord` gives
/// `PasswordManager < UserManager < Admin`.
///
/// A principal without any role-granting membership has *no* role; that state
/// is `Option<Role>::None` at every call site, never a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can view users and groups and reset passwords of unprotected users.
    PasswordManager,
    /// Can additionally create, edit and delete users and manage memberships.
    UserManager,
    /// Unrestricted: structural group changes and protected entities.
    Admin,
}

impl Role {
    /// All roles, highest first (the order in which group mappings are tested).
    pub const DESCENDING: [Role; 3] = [Role::Admin, Role::UserManager, Role::PasswordManager];

    /// All roles, lowest first.
    pub const ASCENDING: [Role; 3] = [Role::PasswordManager, Role::UserManager, Role::Admin];

    /// Lowest role that grants any access at all.
    pub const LOWEST: Role = Role::PasswordManager;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PasswordManager => "password_manager",
            Role::UserManager => "user_manager",
            Role::Admin => "admin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::PasswordManager => "View users and groups, reset passwords of unprotected users",
            Role::UserManager => "Manage users and group memberships outside protected groups",
            Role::Admin => "Full directory administrator",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ASCENDING
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_admin_highest() {
        assert!(Role::Admin > Role::UserManager);
        assert!(Role::UserManager > Role::PasswordManager);
        assert_eq!(Role::DESCENDING.iter().max(), Some(&Role::Admin));
        assert_eq!(Role::ASCENDING.iter().min(), Some(&Role::LOWEST));
    }

    #[test]
    fn parse_round_trips_names() {
        for role in Role::ASCENDING {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::UserManager).unwrap();
        assert_eq!(json, "\"user_manager\"");
    }
}
