use crate::error::{Result, VersionGateError};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Executes version-gate hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script runs in `workdir` with VERSIONGATE_* environment variables
    /// set from the context. Exit code 0 is success, anything else a failure.
    ///
    /// # Arguments
    /// * `script_path` - Path to the hook script (must be executable)
    /// * `workdir` - Directory the script runs in
    /// * `context` - Hook context with environment variables
    pub fn execute(script_path: &str, workdir: &Path, context: &HookContext) -> Result<()> {
        let path = Path::new(script_path);

        if !path.exists() {
            return Err(VersionGateError::hook(format!(
                "Hook script not found: {}",
                script_path
            )));
        }

        if !path.is_file() {
            return Err(VersionGateError::hook(format!(
                "Hook path is not a file: {}",
                script_path
            )));
        }

        let output = Command::new(path)
            .current_dir(workdir)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| {
                VersionGateError::hook(format!("Failed to execute hook {}: {}", script_path, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(VersionGateError::hook(format!(
                "Hook {} failed with exit code {}\nStdout: {}\nStderr: {}",
                script_path,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        info!(hook = context.hook_type.name(), script = script_path, "hook succeeded");
        Ok(())
    }

    /// Try to execute a hook, logging errors but not failing
    ///
    /// Used for post-push hooks where the push has already succeeded and we
    /// don't want a hook failure to retroactively fail the operation.
    pub fn execute_permissive(script_path: &str, workdir: &Path, context: &HookContext) {
        if let Err(e) = Self::execute(script_path, workdir, context) {
            warn!(hook = context.hook_type.name(), error = %e, "hook failed");
        }
    }
}
