use crate::domain::IncrementKind;
use crate::error::{Result, VersionGateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The package's released version as persisted in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionArtifact {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionArtifact {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        VersionArtifact {
            major,
            minor,
            patch,
        }
    }

    /// Apply an increment, resetting lower-order components.
    ///
    /// This is the only way a version changes:
    /// - **Major**: major += 1, minor = 0, patch = 0
    /// - **Minor**: minor += 1, patch = 0
    /// - **Patch**: patch += 1
    ///
    /// `IncrementKind::None` is rejected, as is a component overflow. The
    /// result is always strictly greater than `self`.
    pub fn increment(&self, kind: IncrementKind) -> Result<Self> {
        let overflow = |component: &str| {
            VersionGateError::artifact(format!(
                "{} component of {} cannot be incremented further",
                component, self
            ))
        };

        let next = match kind {
            IncrementKind::Major => VersionArtifact {
                major: self.major.checked_add(1).ok_or_else(|| overflow("major"))?,
                minor: 0,
                patch: 0,
            },
            IncrementKind::Minor => VersionArtifact {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(|| overflow("minor"))?,
                patch: 0,
            },
            IncrementKind::Patch => VersionArtifact {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(|| overflow("patch"))?,
            },
            IncrementKind::None => {
                return Err(VersionGateError::artifact(format!(
                    "no increment selected for {}",
                    self
                )))
            }
        };

        debug_assert!(next > *self);
        Ok(next)
    }
}

impl fmt::Display for VersionArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
