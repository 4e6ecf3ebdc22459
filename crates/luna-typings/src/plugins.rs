//! Mapping from plugin ids to the declarations they need

use std::collections::BTreeMap;

use luna_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const EMBEDDED_MAPPING: &str = include_str!("../assets/plugin-typings.json");

/// Declarations required by one plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    #[serde(rename = "typingFile", default)]
    pub typing_files: Vec<String>,
}

/// Plugin id to declaration mapping, as stored in `plugin-typings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginTypings {
    plugins: BTreeMap<String, PluginEntry>,
}

impl PluginTypings {
    /// Load a mapping file (format by extension).
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        ConfigStore::new().load(path).map_err(|e| Error::PluginMapping {
            message: e.to_string(),
        })
    }

    /// Load a mapping file, logging and returning `None` on failure.
    ///
    /// A missing mapping only disables plugin typings; callers carry on.
    pub fn load_or_log(path: &NormalizedPath) -> Option<Self> {
        match Self::load(path) {
            Ok(mapping) => Some(mapping),
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Plugin typings mapping unavailable, skipping plugin typings");
                None
            }
        }
    }

    /// The mapping shipped with the embedded bundle.
    pub fn embedded() -> Result<Self> {
        Ok(serde_json::from_str(EMBEDDED_MAPPING)?)
    }

    pub fn plugin_ids(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Declarations for `plugins`, de-duplicated in first-seen order.
    ///
    /// Unknown plugins contribute nothing.
    pub fn typings_for<S: AsRef<str>>(&self, plugins: &[S]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for plugin in plugins {
            let plugin = plugin.as_ref();
            let Some(entry) = self.plugins.get(plugin) else {
                tracing::debug!(plugin, "No typings known for plugin");
                continue;
            };
            for file in &entry.typing_files {
                if !out.contains(file) {
                    out.push(file.clone());
                }
            }
        }
        out
    }
}
