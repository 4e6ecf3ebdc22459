//! Synchronizer configuration
//!
//! Every folder and file name the synchronizer touches is a value here
//! rather than a global constant, so callers (and tests) can point the
//! whole component at any directory layout.

use std::time::Duration;

use luna_fs::{ConfigStore, LunaPath, NormalizedPath, RobustnessConfig};
use serde::{Deserialize, Serialize};

use crate::Result;

fn default_typings() -> Vec<String> {
    vec!["luna/luna.d.ts".to_string()]
}

/// Names and limits used by the project locator and synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Marker file whose presence identifies a Luna project
    pub marker_file: String,
    /// Editor folder under the project root
    pub editor_dir: String,
    /// Typings folder under the editor folder, where declarations are installed
    pub project_typings_dir: String,
    /// User typings folder under the project root; also holds the index
    pub user_typings_dir: String,
    /// File name of the reference index
    pub index_file: String,
    /// Declarations installed for every recognized project
    pub default_typings: Vec<String>,
    /// Milliseconds to wait for the project lock before giving up
    pub lock_timeout_ms: u64,
    /// Whether usage telemetry may be recorded at all
    pub telemetry: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            marker_file: LunaPath::ProjectMarker.to_string(),
            editor_dir: LunaPath::EditorDir.to_string(),
            project_typings_dir: LunaPath::TypingsDir.to_string(),
            user_typings_dir: LunaPath::TypingsDir.to_string(),
            index_file: LunaPath::IndexFile.to_string(),
            default_typings: default_typings(),
            lock_timeout_ms: 5_000,
            telemetry: true,
        }
    }
}

impl SyncConfig {
    /// Load a config file (TOML, JSON or YAML by extension).
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Load `<project>/.luna/config.toml` if present, else defaults.
    pub fn discover(project_root: &NormalizedPath) -> Result<Self> {
        let path = Self::project_config_path(project_root);
        match ConfigStore::new().load_if_exists(&path)? {
            Some(config) => {
                tracing::debug!(path = %path, "Loaded project config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Location of the per-project config file.
    pub fn project_config_path(project_root: &NormalizedPath) -> NormalizedPath {
        project_root
            .join(LunaPath::ConfigDir.as_str())
            .join("config.toml")
    }

    /// Robustness settings derived from this config.
    pub fn robustness(&self) -> RobustnessConfig {
        RobustnessConfig {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            ..RobustnessConfig::default()
        }
    }
}
