//! Loading and storing the version artifact file.
//!
//! The artifact is a three-field record (`major`, `minor`, `patch`) kept at a
//! fixed path in the repository. Its encoding follows the file extension:
//! `.json` or `.toml`. Any other extension is a configuration error.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::VersionArtifact;
use crate::error::{Result, VersionGateError};

/// Encoding of the artifact file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Toml,
}

impl ArtifactFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("toml") => Ok(ArtifactFormat::Toml),
            other => Err(VersionGateError::config(format!(
                "Unsupported version artifact extension {:?} for {} (expected .json or .toml)",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

/// Handle on the artifact file inside a working tree
#[derive(Debug, Clone)]
pub struct ArtifactFile {
    path: PathBuf,
    format: ArtifactFormat,
}

impl ArtifactFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = ArtifactFormat::from_path(&path)?;
        Ok(ArtifactFile { path, format })
    }

    /// Resolve `relative` against a repository working directory
    pub fn in_workdir(workdir: &Path, relative: &Path) -> Result<Self> {
        if !is_inside_tree(relative) {
            return Err(VersionGateError::config(format!(
                "Version artifact path must be relative to the repository: {}",
                relative.display()
            )));
        }
        Self::new(workdir.join(relative))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Read the current version from disk
    pub fn load(&self) -> Result<VersionArtifact> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            VersionGateError::artifact(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        self.decode(&content)
    }

    /// Overwrite the file with `version`
    pub fn store(&self, version: &VersionArtifact) -> Result<()> {
        let content = self.encode(version)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Parse file content in this artifact's format
    pub fn decode(&self, content: &str) -> Result<VersionArtifact> {
        let parsed: std::result::Result<VersionArtifact, String> = match self.format {
            ArtifactFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ArtifactFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| {
            VersionGateError::artifact(format!("Cannot parse {}: {}", self.path.display(), e))
        })
    }

    fn encode(&self, version: &VersionArtifact) -> Result<String> {
        let mut content = match self.format {
            ArtifactFormat::Json => {
                serde_json::to_string_pretty(version).map_err(|e| e.to_string())
            }
            ArtifactFormat::Toml => toml::to_string(version).map_err(|e| e.to_string()),
        }
        .map_err(VersionGateError::artifact)?;

        if !content.ends_with('\n') {
            content.push('\n');
        }
        Ok(content)
    }
}

/// Whether `path` is relative and stays below the directory it is joined to
pub(crate) fn is_inside_tree(path: &Path) -> bool {
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
