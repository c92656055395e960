//! Role mapping defaults for an LLDAP directory.

use std::collections::BTreeMap;

use crate::mapper::{ConfiguredRoleMapper, RoleMapperConfig, RoleMapperConfigError, RoleMapperOverrides};
use crate::Role;

pub const ADMIN_GROUP: &str = "lldap_admin";
pub const USER_MANAGER_GROUP: &str = "lldap_user_manager";
pub const AUTHELIA_USER_MANAGER_GROUP: &str = "authelia_user_manager";
pub const PASSWORD_MANAGER_GROUP: &str = "lldap_password_manager";

/// Default LLDAP mapping; every role-granting group is protected.
pub fn default_config() -> RoleMapperConfig {
    let mut role_groups = BTreeMap::new();
    role_groups.insert(Role::Admin, vec![ADMIN_GROUP.to_string()]);
    role_groups.insert(
        Role::UserManager,
        vec![USER_MANAGER_GROUP.to_string(), AUTHELIA_USER_MANAGER_GROUP.to_string()],
    );
    role_groups.insert(Role::PasswordManager, vec![PASSWORD_MANAGER_GROUP.to_string()]);

    let protected_groups = granting_groups(&role_groups);
    RoleMapperConfig {
        role_groups,
        protected_groups,
    }
}

fn granting_groups(role_groups: &BTreeMap<Role, Vec<String>>) -> Vec<String> {
    Role::DESCENDING
        .iter()
        .filter_map(|role| role_groups.get(role))
        .flatten()
        .cloned()
        .collect()
}

/// Mapper with the stock LLDAP groups.
pub fn role_mapper() -> ConfiguredRoleMapper {
    ConfiguredRoleMapper::build(default_config())
}

/// Mapper with caller overrides merged onto the LLDAP defaults.
///
/// Groups that grant a role through an override are protected as well, so a
/// `UserManager` can never add itself to a replacement admin group.
pub fn role_mapper_with(overrides: RoleMapperOverrides) -> Result<ConfiguredRoleMapper, RoleMapperConfigError> {
    let replaced = granting_groups(&overrides.role_groups);
    let mut config = default_config().merge(overrides);
    config = config.merge(RoleMapperOverrides {
        role_groups: BTreeMap::new(),
        protected_groups: replaced,
    });
    ConfiguredRoleMapper::new(config)
}
