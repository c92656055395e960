//! Denial vocabulary and check results.
//!
//! The kebab-case codes are a stable contract: presentation layers render
//! them and tests pattern-match on them. Messages never carry directory
//! identifiers or other internal state.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Closed taxonomy of denial reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenialKind {
    PrincipalNotFound,
    PrincipalDisabled,
    NoRole,
    PermissionNotGranted,
    TargetRequired,
    ProtectedEntity,
    GroupNotFound,
    InvalidEntityType,
}

impl DenialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialKind::PrincipalNotFound => "principal-not-found",
            DenialKind::PrincipalDisabled => "principal-disabled",
            DenialKind::NoRole => "no-role",
            DenialKind::PermissionNotGranted => "permission-not-granted",
            DenialKind::TargetRequired => "target-required",
            DenialKind::ProtectedEntity => "protected-entity",
            DenialKind::GroupNotFound => "group-not-found",
            DenialKind::InvalidEntityType => "invalid-entity-type",
        }
    }
}

impl core::fmt::Display for DenialKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a check was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
}

/// Outcome of a detailed access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessCheckResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial: Option<Denial>,
    /// Minimum role that would have been granted the request, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,
}

impl AccessCheckResult {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            denial: None,
            required_role: None,
        }
    }

    pub fn deny(kind: DenialKind, message: impl Into<String>, required_role: Option<Role>) -> Self {
        Self {
            allowed: false,
            denial: Some(Denial {
                kind,
                message: message.into(),
            }),
            required_role,
        }
    }

    pub fn reason(&self) -> Option<DenialKind> {
        self.denial.as_ref().map(|d| d.kind)
    }

    pub fn message(&self) -> Option<&str> {
        self.denial.as_ref().map(|d| d.message.as_str())
    }
}
