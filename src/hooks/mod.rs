//! Hook scripts around the increment commit
//!
//! - pre-commit: after the artifact is written, before committing; a failure
//!   aborts the run with nothing committed
//! - post-push: after the increment commit is pushed; a failure is only logged

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
