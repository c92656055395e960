//! Static role → permission catalog.
//!
//! Built once, by inheritance: each role's set is the set of the role below it
//! plus the permissions it adds. The superset invariant follows from that
//! construction and is also asserted by the property tests below.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use serde::Serialize;

use crate::{Permission, Role};

const PASSWORD_MANAGER_GRANTS: &[Permission] = &[
    Permission::UserView,
    Permission::UserList,
    Permission::GroupView,
    Permission::GroupList,
    Permission::UserChangePassword,
];

const USER_MANAGER_GRANTS: &[Permission] = &[
    Permission::UserCreate,
    Permission::UserEdit,
    Permission::UserDelete,
    Permission::UserAddToGroup,
    Permission::UserRemoveFromGroup,
];

const ADMIN_GRANTS: &[Permission] = &[
    Permission::GroupCreate,
    Permission::GroupEdit,
    Permission::GroupDelete,
];

fn own_grants(role: Role) -> &'static [Permission] {
    match role {
        Role::PasswordManager => PASSWORD_MANAGER_GRANTS,
        Role::UserManager => USER_MANAGER_GRANTS,
        Role::Admin => ADMIN_GRANTS,
    }
}

static ROLE_PERMISSIONS: LazyLock<HashMap<Role, BTreeSet<Permission>>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    let mut inherited = BTreeSet::new();
    for role in Role::ASCENDING {
        inherited.extend(own_grants(role).iter().copied());
        table.insert(role, inherited.clone());
    }
    table
});

/// Permission set of `role`.
pub fn permissions_of(role: Role) -> &'static BTreeSet<Permission> {
    &ROLE_PERMISSIONS[&role]
}

/// Whether `role` grants `permission` (base test, no context).
pub fn role_grants(role: Role, permission: Permission) -> bool {
    permissions_of(role).contains(&permission)
}

/// Lowest role whose permission set contains `permission`.
///
/// Falls back to `Admin` when no role grants it.
pub fn minimum_role_for(permission: Permission) -> Role {
    Role::ASCENDING
        .into_iter()
        .find(|role| role_grants(*role, permission))
        .unwrap_or(Role::Admin)
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog description (audit/display)
// ─────────────────────────────────────────────────────────────────────────────

/// Role definition with its granted permissions.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub description: &'static str,
    pub inherits: Option<Role>,
    pub permissions: Vec<Permission>,
}

/// Permission definition with the lowest role granting it.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionDefinition {
    pub permission: Permission,
    pub description: &'static str,
    pub minimum_role: Role,
}

/// Full view of the catalog, highest role first.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDescription {
    pub roles: Vec<RoleDefinition>,
    pub permissions: Vec<PermissionDefinition>,
}

pub fn describe() -> CatalogDescription {
    let roles = Role::DESCENDING
        .into_iter()
        .map(|role| RoleDefinition {
            role,
            description: role.description(),
            inherits: Role::ASCENDING.into_iter().filter(|r| *r < role).max(),
            permissions: permissions_of(role).iter().copied().collect(),
        })
        .collect();

    let permissions = Permission::ALL
        .into_iter()
        .map(|permission| PermissionDefinition {
            permission,
            description: permission.description(),
            minimum_role: minimum_role_for(permission),
        })
        .collect();

    CatalogDescription { roles, permissions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ASCENDING.to_vec())
    }

    #[test]
    fn password_manager_is_the_base_set() {
        let perms = permissions_of(Role::PasswordManager);
        assert!(perms.contains(&Permission::UserChangePassword));
        assert!(perms.contains(&Permission::GroupList));
        assert!(!perms.contains(&Permission::UserEdit));
    }

    #[test]
    fn admin_has_every_permission() {
        for perm in Permission::ALL {
            assert!(role_grants(Role::Admin, perm), "admin lacks {perm}");
        }
    }

    #[test]
    fn group_structure_changes_are_admin_only() {
        for perm in [Permission::GroupCreate, Permission::GroupEdit, Permission::GroupDelete] {
            assert_eq!(minimum_role_for(perm), Role::Admin);
            assert!(!role_grants(Role::UserManager, perm));
        }
    }

    #[test]
    fn minimum_role_matches_inheritance() {
        assert_eq!(minimum_role_for(Permission::UserList), Role::PasswordManager);
        assert_eq!(minimum_role_for(Permission::UserAddToGroup), Role::UserManager);
    }

    #[test]
    fn describe_lists_roles_highest_first() {
        let desc = describe();
        let roles: Vec<Role> = desc.roles.iter().map(|r| r.role).collect();
        assert_eq!(roles, Role::DESCENDING.to_vec());
        assert_eq!(desc.roles[0].inherits, Some(Role::UserManager));
        assert_eq!(desc.roles[2].inherits, None);
        assert_eq!(desc.permissions.len(), Permission::ALL.len());
    }

    proptest! {
        /// Property: a higher role's permission set is a superset of any lower role's.
        #[test]
        fn higher_role_is_superset(a in any_role(), b in any_role()) {
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            prop_assert!(permissions_of(hi).is_superset(permissions_of(lo)));
        }

        /// Property: the minimum role grants the permission and no lower role does.
        #[test]
        fn minimum_role_is_minimal(perm in prop::sample::select(Permission::ALL.to_vec())) {
            let min = minimum_role_for(perm);
            prop_assert!(role_grants(min, perm));
            for role in Role::ASCENDING.into_iter().filter(|r| *r < min) {
                prop_assert!(!role_grants(role, perm));
            }
        }
    }
}
