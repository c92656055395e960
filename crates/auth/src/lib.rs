//! `dirguard-auth` — directory authorization decision engine.
//!
//! This crate is intentionally decoupled from HTTP, sessions and directory
//! transport: principals and groups arrive through [`DirectoryLookup`], role
//! assignment through [`RoleMapper`].

pub mod authorize;
pub mod catalog;
pub mod context;
pub mod directory;
pub mod lldap;
pub mod mapper;
pub mod permissions;
pub mod reason;
pub mod roles;

pub use authorize::{AccessControl, AccessError, DISABLED_GROUP};
pub use catalog::{minimum_role_for, permissions_of};
pub use context::{EntityType, UserAccessContext};
pub use directory::{DirectoryError, DirectoryLookup, Group, GroupRef, Principal};
pub use mapper::{ConfiguredRoleMapper, RoleMapper, RoleMapperConfig, RoleMapperConfigError, RoleMapperOverrides};
pub use permissions::{EntityKind, Permission, UnknownPermission};
pub use reason::{AccessCheckResult, Denial, DenialKind};
pub use roles::{Role, UnknownRole};

pub use dirguard_core::{GroupId, UserId};
