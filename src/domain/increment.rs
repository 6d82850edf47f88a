use serde::{Deserialize, Serialize};
use std::fmt;

/// Label requesting a major version increment
pub const MAJOR_LABEL: &str = "major-increment";
/// Label requesting a minor version increment
pub const MINOR_LABEL: &str = "minor-increment";
/// Label requesting a patch version increment
pub const PATCH_LABEL: &str = "patch-increment";

/// Ordinal severity of a version increment.
///
/// Variant order is the severity order, so the derived `Ord` gives
/// `Major > Minor > Patch > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementKind {
    None,
    Patch,
    Minor,
    Major,
}

impl IncrementKind {
    /// Map a reserved label to its increment, `None` for any other label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            MAJOR_LABEL => Some(IncrementKind::Major),
            MINOR_LABEL => Some(IncrementKind::Minor),
            PATCH_LABEL => Some(IncrementKind::Patch),
            _ => None,
        }
    }

    /// The reserved label for this increment
    pub fn label(&self) -> Option<&'static str> {
        match self {
            IncrementKind::Major => Some(MAJOR_LABEL),
            IncrementKind::Minor => Some(MINOR_LABEL),
            IncrementKind::Patch => Some(PATCH_LABEL),
            IncrementKind::None => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IncrementKind::Major => "major",
            IncrementKind::Minor => "minor",
            IncrementKind::Patch => "patch",
            IncrementKind::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == IncrementKind::None
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
