use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::is_inside_tree;
use crate::error::{Result, VersionGateError};

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "versiongate.toml";

/// Represents the complete configuration for version-gate.
///
/// Contains the gated branch, the artifact location, the automation commit
/// identity and optional hook scripts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Pull requests into this branch are gated and incremented on merge
    #[serde(default = "default_target_branch")]
    pub target_branch: String,

    /// Remote the increment commit is pushed to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Fetch from the remote before checking out the merge commit
    #[serde(default)]
    pub fetch: bool,

    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub commit: CommitConfig,

    #[serde(default)]
    pub hooks: HooksConfig,
}

fn default_target_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("version.json")
}

fn default_author_name() -> String {
    "github-actions[bot]".to_string()
}

fn default_author_email() -> String {
    "41898282+github-actions[bot]@users.noreply.github.com".to_string()
}

fn default_commit_message() -> String {
    "Increment package version".to_string()
}

/// Location of the version artifact, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArtifactConfig {
    #[serde(default = "default_artifact_path")]
    pub path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig {
            path: default_artifact_path(),
        }
    }
}

/// Fixed automation identity and message for the increment commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,

    #[serde(default = "default_commit_message")]
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            author_name: default_author_name(),
            author_email: default_author_email(),
            message: default_commit_message(),
        }
    }
}

/// Optional scripts run around the increment commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    /// Runs after the artifact is written, before committing; failure aborts
    #[serde(default)]
    pub pre_commit: Option<String>,

    /// Runs after a successful push; failure is only reported
    #[serde(default)]
    pub post_push: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_branch: default_target_branch(),
            remote: default_remote(),
            fetch: false,
            artifact: ArtifactConfig::default(),
            commit: CommitConfig::default(),
            hooks: HooksConfig::default(),
        }
    }
}

impl Config {
    /// Reject values that would make the apply path misbehave
    pub fn validate(&self) -> Result<()> {
        if self.target_branch.trim().is_empty() {
            return Err(VersionGateError::config("target_branch must not be empty"));
        }
        if self.remote.trim().is_empty() {
            return Err(VersionGateError::config("remote must not be empty"));
        }
        if !is_inside_tree(&self.artifact.path) {
            return Err(VersionGateError::config(format!(
                "artifact.path must be relative to the repository root and stay inside it: {}",
                self.artifact.path.display()
            )));
        }
        if self.commit.author_name.trim().is_empty() || self.commit.author_email.trim().is_empty()
        {
            return Err(VersionGateError::config(
                "commit.author_name and commit.author_email must be set",
            ));
        }
        if self.commit.message.trim().is_empty() {
            return Err(VersionGateError::config("commit.message must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versiongate.toml` in current directory
/// 3. `.versiongate.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        read_config_file(Path::new(CONFIG_FILE_NAME))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| VersionGateError::config(format!("Invalid configuration: {}", e)))?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        VersionGateError::config(format!("Cannot read {}: {}", path.display(), e))
    })
}
