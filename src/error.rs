use thiserror::Error;

/// Unified error type for version-gate operations
#[derive(Error, Debug)]
pub enum VersionGateError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version artifact error: {0}")]
    Artifact(String),

    #[error("Event error: {0}")]
    Event(String),

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),

    #[error("Push to '{branch}' rejected, branch moved since checkout: {detail}")]
    ConcurrentMutationConflict { branch: String, detail: String },

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in version-gate
pub type Result<T> = std::result::Result<T, VersionGateError>;

impl VersionGateError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionGateError::Config(msg.into())
    }

    /// Create a version artifact error with context
    pub fn artifact(msg: impl Into<String>) -> Self {
        VersionGateError::Artifact(msg.into())
    }

    /// Create an event parsing error with context
    pub fn event(msg: impl Into<String>) -> Self {
        VersionGateError::Event(msg.into())
    }

    pub fn policy(msg: impl Into<String>) -> Self {
        VersionGateError::PolicyViolation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        VersionGateError::MissingPrecondition(msg.into())
    }

    /// Create a push conflict error for the given branch
    pub fn conflict(branch: impl Into<String>, detail: impl Into<String>) -> Self {
        VersionGateError::ConcurrentMutationConflict {
            branch: branch.into(),
            detail: detail.into(),
        }
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        VersionGateError::Remote(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        VersionGateError::Hook(msg.into())
    }

    /// Whether this error means another run already moved the target branch
    pub fn is_conflict(&self) -> bool {
        matches!(self, VersionGateError::ConcurrentMutationConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VersionGateError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VersionGateError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_conflict_display_names_branch() {
        let err = VersionGateError::conflict("main", "cannot push non-fastforwardable reference");
        let msg = err.to_string();
        assert!(msg.contains("'main'"));
        assert!(msg.contains("non-fastforwardable"));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_only_conflict_is_conflict() {
        let errors = vec![
            VersionGateError::config("x"),
            VersionGateError::artifact("x"),
            VersionGateError::event("x"),
            VersionGateError::policy("x"),
            VersionGateError::precondition("x"),
            VersionGateError::remote("x"),
            VersionGateError::hook("x"),
        ];

        for err in errors {
            assert!(!err.is_conflict(), "unexpected conflict: {}", err);
        }
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (VersionGateError::config("x"), "Configuration error"),
            (VersionGateError::artifact("x"), "Version artifact error"),
            (VersionGateError::event("x"), "Event error"),
            (VersionGateError::policy("x"), "Policy violation"),
            (VersionGateError::precondition("x"), "Missing precondition"),
            (VersionGateError::remote("x"), "Remote operation failed"),
            (VersionGateError::hook("x"), "Hook error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
