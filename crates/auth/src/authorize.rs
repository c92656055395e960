use core::str::FromStr;

use thiserror::Error;
use tracing::{debug, info, warn};

use dirguard_core::{GroupId, IdError, UserId};

use crate::catalog::minimum_role_for;
use crate::{
    AccessCheckResult, DenialKind, DirectoryError, DirectoryLookup, EntityType, Permission, Role, RoleMapper,
    UserAccessContext,
};

/// Name of the group that switches an account off, whatever else it belongs to.
pub const DISABLED_GROUP: &str = "disabled";

/// Engine-level failure. Distinct from a denial: the caller cannot know
/// whether access would have been granted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("directory lookup failed: {0}")]
    Directory(#[from] DirectoryError),
}

/// Access decision engine.
///
/// Stateless apart from its collaborators: every call performs its own
/// directory lookups and builds a fresh `UserAccessContext`. Results are a
/// point-in-time snapshot; callers needing strict freshness re-check right
/// before the guarded mutation.
pub struct AccessControl<D, M> {
    directory: D,
    mapper: M,
}

impl<D, M> AccessControl<D, M>
where
    D: DirectoryLookup,
    M: RoleMapper,
{
    pub fn new(directory: D, mapper: M) -> Self {
        Self { directory, mapper }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Boolean form of [`Self::check_with_details`].
    pub async fn check(
        &self,
        principal_id: &UserId,
        permission: Permission,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> Result<bool, AccessError> {
        Ok(self
            .check_with_details(principal_id, permission, entity_type, entity_id)
            .await?
            .allowed)
    }

    /// Decide whether `principal_id` may perform `permission` on the target.
    pub async fn check_with_details(
        &self,
        principal_id: &UserId,
        permission: Permission,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> Result<AccessCheckResult, AccessError> {
        let result = match self.evaluate(principal_id, permission, entity_type, entity_id).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    principal = %principal_id,
                    permission = %permission,
                    error = %err,
                    "access check aborted: directory failure"
                );
                return Err(err);
            }
        };

        if result.allowed {
            debug!(principal = %principal_id, permission = %permission, "access granted");
        } else {
            info!(
                principal = %principal_id,
                permission = %permission,
                entity_type = ?entity_type,
                reason = result.reason().map(|r| r.as_str()).unwrap_or_default(),
                required_role = ?result.required_role,
                "access denied"
            );
        }
        Ok(result)
    }

    async fn evaluate(
        &self,
        principal_id: &UserId,
        permission: Permission,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> Result<AccessCheckResult, AccessError> {
        let Some(principal) = self.directory.get_principal(principal_id).await? else {
            return Ok(AccessCheckResult::deny(
                DenialKind::PrincipalNotFound,
                "principal not found or not authenticated",
                None,
            ));
        };

        let groups = principal.group_names();
        if groups.iter().any(|g| g.to_lowercase() == DISABLED_GROUP) {
            return Ok(AccessCheckResult::deny(
                DenialKind::PrincipalDisabled,
                "principal is disabled",
                None,
            ));
        }

        let context = UserAccessContext::from_groups(principal.id, groups, &self.mapper);
        let Some(role) = context.role else {
            return Ok(AccessCheckResult::deny(
                DenialKind::NoRole,
                "principal has no valid role",
                Some(Role::LOWEST),
            ));
        };

        if !context.has_permission(permission) {
            return Ok(AccessCheckResult::deny(
                DenialKind::PermissionNotGranted,
                format!("permission '{permission}' not granted to role '{role}'"),
                Some(minimum_role_for(permission)),
            ));
        }

        if role == Role::Admin {
            debug!(principal = %context.principal_id, "admin bypasses contextual restrictions");
            return Ok(AccessCheckResult::allow());
        }

        match permission {
            Permission::UserChangePassword | Permission::UserEdit | Permission::UserDelete => {
                self.check_user_target(&context, entity_type, entity_id).await
            }
            Permission::UserAddToGroup | Permission::UserRemoveFromGroup => {
                self.check_membership_target(permission, entity_type, entity_id).await
            }
            _ => Ok(AccessCheckResult::allow()),
        }
    }

    /// Password change, edit and delete of a single user.
    async fn check_user_target(
        &self,
        context: &UserAccessContext,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> Result<AccessCheckResult, AccessError> {
        if entity_type == EntityType::Group {
            return Ok(AccessCheckResult::deny(
                DenialKind::InvalidEntityType,
                "operation targets a user, not a group",
                None,
            ));
        }

        let Some(target) = parse_target::<UserId>(entity_id) else {
            return Ok(AccessCheckResult::deny(
                DenialKind::TargetRequired,
                "target user id required",
                None,
            ));
        };

        if target == context.principal_id {
            debug!(principal = %target, "self-action bypasses protection");
            return Ok(AccessCheckResult::allow());
        }

        if self.is_user_protected(&target).await? {
            return Ok(AccessCheckResult::deny(
                DenialKind::ProtectedEntity,
                "cannot act on protected user",
                Some(Role::Admin),
            ));
        }

        Ok(AccessCheckResult::allow())
    }

    /// Adding a user to, or removing a user from, a group.
    async fn check_membership_target(
        &self,
        permission: Permission,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> Result<AccessCheckResult, AccessError> {
        match entity_type {
            EntityType::User => {
                let Some(target) = parse_target::<UserId>(entity_id) else {
                    return Ok(AccessCheckResult::deny(
                        DenialKind::TargetRequired,
                        "target user id required",
                        None,
                    ));
                };
                if self.is_user_protected(&target).await? {
                    return Ok(AccessCheckResult::deny(
                        DenialKind::ProtectedEntity,
                        "cannot change group memberships of protected user",
                        Some(Role::Admin),
                    ));
                }
                Ok(AccessCheckResult::allow())
            }
            EntityType::Group => {
                let Some(group_id) = parse_target::<GroupId>(entity_id) else {
                    return Ok(AccessCheckResult::deny(
                        DenialKind::TargetRequired,
                        "group id required",
                        None,
                    ));
                };
                let Some(group) = self.directory.get_group(&group_id).await? else {
                    return Ok(AccessCheckResult::deny(DenialKind::GroupNotFound, "group not found", None));
                };
                if self.mapper.is_protected_group(&group.display_name) {
                    let message = if permission == Permission::UserAddToGroup {
                        "cannot add to protected group"
                    } else {
                        "cannot remove from protected group"
                    };
                    return Ok(AccessCheckResult::deny(
                        DenialKind::ProtectedEntity,
                        message,
                        Some(Role::Admin),
                    ));
                }
                Ok(AccessCheckResult::allow())
            }
            EntityType::None => Ok(AccessCheckResult::deny(
                DenialKind::TargetRequired,
                "membership changes require a user or group target",
                None,
            )),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Auxiliary queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn is_protected_group(&self, name: &str) -> bool {
        self.mapper.is_protected_group(name)
    }

    /// Whether the user belongs to a protected group. Unknown users are not protected.
    pub async fn is_user_protected(&self, user_id: &UserId) -> Result<bool, AccessError> {
        let Some(user) = self.directory.get_principal(user_id).await? else {
            return Ok(false);
        };
        Ok(self.mapper.is_protected_by_groups(&user.group_names()))
    }

    /// Protection test for callers that already hold the user's groups
    /// (bulk listings), without another lookup.
    pub fn is_user_protected_by_groups(&self, group_names: &[String]) -> bool {
        self.mapper.is_protected_by_groups(group_names)
    }

    pub async fn get_user_role(&self, user_id: &UserId) -> Result<Option<Role>, AccessError> {
        Ok(self.get_user_context(user_id).await?.role)
    }

    pub async fn get_user_permissions(&self, user_id: &UserId) -> Result<Vec<Permission>, AccessError> {
        Ok(self.get_user_context(user_id).await?.permissions)
    }

    /// Fresh context for `user_id`; empty (no role) when the user does not exist.
    pub async fn get_user_context(&self, user_id: &UserId) -> Result<UserAccessContext, AccessError> {
        match self.directory.get_principal(user_id).await? {
            Some(user) => {
                let groups = user.group_names();
                Ok(UserAccessContext::from_groups(user.id, groups, &self.mapper))
            }
            None => Ok(UserAccessContext::empty(user_id.clone())),
        }
    }
}

/// Missing, blank and malformed ids all count as "no target".
fn parse_target<T>(raw: Option<&str>) -> Option<T>
where
    T: FromStr<Err = IdError>,
{
    match raw?.parse::<T>() {
        Ok(id) => Some(id),
        Err(err) => {
            debug!(error = %err, "ignoring malformed target id");
            None
        }
    }
}
