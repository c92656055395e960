//! Strongly-typed directory identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{IdError, IdResult};

/// Identifier of a directory user (also the principal id of an authenticated user).
///
/// User ids are case-insensitive in the directory; they are stored lowercased
/// so that equality (and therefore self-action detection) ignores case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

/// Identifier of a directory group.
///
/// Opaque to the engine: backends may use numeric ids or uuids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

fn validate(kind: &'static str, raw: &str) -> IdResult<()> {
    if raw.trim().is_empty() {
        return Err(IdError::Empty(kind));
    }
    if let Some(ch) = raw.chars().find(|c| c.is_control() || c.is_whitespace()) {
        return Err(IdError::InvalidCharacter { kind, ch });
    }
    Ok(())
}

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal, $normalize:expr) => {
        impl $t {
            /// Validate and construct an identifier.
            pub fn new(raw: impl AsRef<str>) -> IdResult<Self> {
                let raw = raw.as_ref();
                validate($name, raw)?;
                let normalize: fn(&str) -> String = $normalize;
                Ok(Self(normalize(raw)))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(UserId, "UserId", |s| s.to_lowercase());
impl_string_newtype!(GroupId, "GroupId", |s| s.to_string());
