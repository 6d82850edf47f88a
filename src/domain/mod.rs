//! Domain logic - pure policy rules independent of git operations

pub mod branch;
pub mod event;
pub mod increment;
pub mod label;
pub mod version;

pub use branch::BranchContext;
pub use event::{EventKind, PullRequestEvent};
pub use increment::{IncrementKind, MAJOR_LABEL, MINOR_LABEL, PATCH_LABEL};
pub use label::{classify, reserved_in, LabelSet};
pub use version::VersionArtifact;
