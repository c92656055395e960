//! Role mapping: directory group names → abstract role.
//!
//! Group-name matching is data (`RoleMapperConfig`), injected at construction,
//! so the mapping can be tested without a directory or an engine.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Mapping configuration: which groups grant which role, and which groups are protected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMapperConfig {
    /// Role → names of the groups granting it.
    pub role_groups: BTreeMap<Role, Vec<String>>,

    /// Groups only an `Admin` may alter (or whose members only an `Admin` may alter).
    #[serde(default)]
    pub protected_groups: Vec<String>,
}

/// Caller-supplied adjustments to a backend's default configuration.
///
/// Role entries *replace* the default granting groups for that role;
/// protected groups are *added* to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMapperOverrides {
    #[serde(default)]
    pub role_groups: BTreeMap<Role, Vec<String>>,

    #[serde(default)]
    pub protected_groups: Vec<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleMapperConfigError {
    #[error("empty group name configured for role '{0}'")]
    EmptyRoleGroup(Role),

    #[error("empty protected group name")]
    EmptyProtectedGroup,
}

impl RoleMapperConfig {
    /// Reject blank group names (they would silently never match).
    pub fn validate(&self) -> Result<(), RoleMapperConfigError> {
        for (role, groups) in &self.role_groups {
            if groups.iter().any(|g| g.trim().is_empty()) {
                return Err(RoleMapperConfigError::EmptyRoleGroup(*role));
            }
        }
        if self.protected_groups.iter().any(|g| g.trim().is_empty()) {
            return Err(RoleMapperConfigError::EmptyProtectedGroup);
        }
        Ok(())
    }

    /// Apply overrides: replacement per role, union for protected groups.
    pub fn merge(mut self, overrides: RoleMapperOverrides) -> Self {
        for (role, groups) in overrides.role_groups {
            self.role_groups.insert(role, groups);
        }
        for group in overrides.protected_groups {
            let known = self
                .protected_groups
                .iter()
                .any(|g| normalize(g) == normalize(&group));
            if !known {
                self.protected_groups.push(group);
            }
        }
        self
    }
}

pub(crate) fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// Pluggable role mapping, one implementation per directory backend.
pub trait RoleMapper: Send + Sync {
    /// Highest role granted by any of `group_names`, or `None`.
    fn map_groups_to_role(&self, group_names: &[String]) -> Option<Role>;

    /// Case-insensitive exact match against the protected set.
    fn is_protected_group(&self, name: &str) -> bool;

    /// Copy of the protected group names.
    fn protected_groups(&self) -> Vec<String>;

    /// Copy of the live configuration.
    fn config(&self) -> RoleMapperConfig;

    /// Whether any of `group_names` is protected.
    fn is_protected_by_groups(&self, group_names: &[String]) -> bool {
        group_names.iter().any(|g| self.is_protected_group(g))
    }
}

/// Config-driven `RoleMapper`.
#[derive(Debug, Clone)]
pub struct ConfiguredRoleMapper {
    config: RoleMapperConfig,
    /// Normalized granting sets, highest role first.
    role_sets: Vec<(Role, HashSet<String>)>,
    protected: HashSet<String>,
}

impl ConfiguredRoleMapper {
    pub fn new(config: RoleMapperConfig) -> Result<Self, RoleMapperConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    pub(crate) fn build(config: RoleMapperConfig) -> Self {
        let role_sets = Role::DESCENDING
            .into_iter()
            .filter_map(|role| {
                let groups = config.role_groups.get(&role)?;
                Some((role, groups.iter().map(|g| normalize(g)).collect()))
            })
            .collect();
        let protected = config.protected_groups.iter().map(|g| normalize(g)).collect();

        Self {
            config,
            role_sets,
            protected,
        }
    }
}

impl RoleMapper for ConfiguredRoleMapper {
    fn map_groups_to_role(&self, group_names: &[String]) -> Option<Role> {
        let normalized: HashSet<String> = group_names.iter().map(|g| normalize(g)).collect();
        self.role_sets
            .iter()
            .find(|(_, granting)| !granting.is_disjoint(&normalized))
            .map(|(role, _)| *role)
    }

    fn is_protected_group(&self, name: &str) -> bool {
        self.protected.contains(&normalize(name))
    }

    fn protected_groups(&self) -> Vec<String> {
        self.config.protected_groups.clone()
    }

    fn config(&self) -> RoleMapperConfig {
        self.config.clone()
    }
}

impl<M: RoleMapper + ?Sized> RoleMapper for std::sync::Arc<M> {
    fn map_groups_to_role(&self, group_names: &[String]) -> Option<Role> {
        (**self).map_groups_to_role(group_names)
    }

    fn is_protected_group(&self, name: &str) -> bool {
        (**self).is_protected_group(name)
    }

    fn protected_groups(&self) -> Vec<String> {
        (**self).protected_groups()
    }

    fn config(&self) -> RoleMapperConfig {
        (**self).config()
    }

    fn is_protected_by_groups(&self, group_names: &[String]) -> bool {
        (**self).is_protected_by_groups(group_names)
    }
}
