//! Workspace folder lifecycle hooks
//!
//! When a folder joins the workspace and turns out to be a Luna project,
//! the default declarations and any plugin declarations are installed.

use luna_fs::NormalizedPath;

use crate::plugins::PluginTypings;
use crate::synchronizer::{InstallReport, InstallRequest, TypingsSynchronizer};
use crate::Result;

/// Reacts to workspace folders being added or removed.
pub struct Activation {
    synchronizer: TypingsSynchronizer,
    plugins: Option<PluginTypings>,
}

impl Activation {
    /// `plugins` is `None` when the mapping could not be loaded; plugin
    /// typings are then skipped.
    pub fn new(synchronizer: TypingsSynchronizer, plugins: Option<PluginTypings>) -> Self {
        Self {
            synchronizer,
            plugins,
        }
    }

    pub fn synchronizer(&self) -> &TypingsSynchronizer {
        &self.synchronizer
    }

    /// Install typings for `folder` if it is a Luna project.
    ///
    /// Returns `Ok(None)` for folders that are not projects.
    pub async fn on_folder_added<S: AsRef<str>>(
        &self,
        folder: &NormalizedPath,
        plugin_ids: &[S],
    ) -> Result<Option<InstallReport>> {
        let locator = self.synchronizer.locator();
        let root = locator.project_root(folder);

        if !locator.is_recognized_project(&root) {
            tracing::debug!(folder = %folder, "Not a Luna project, skipping typings");
            return Ok(None);
        }

        let Some(target) = locator.get_or_create_typings_target(Some(&root))? else {
            return Ok(None);
        };

        let mut typings = self.synchronizer.config().default_typings.clone();
        if !plugin_ids.is_empty() {
            match &self.plugins {
                Some(mapping) => {
                    for file in mapping.typings_for(plugin_ids) {
                        if !typings.contains(&file) {
                            typings.push(file);
                        }
                    }
                }
                None => {
                    tracing::error!("Plugin typings mapping unavailable, skipping plugin typings");
                }
            }
        }

        tracing::info!(project = %root, count = typings.len(), "Luna project detected");
        let report = self
            .synchronizer
            .install(InstallRequest {
                target,
                relative_paths: typings,
                project_root: Some(root),
            })
            .await?;
        Ok(Some(report))
    }

    /// Folders leaving the workspace keep their installed typings.
    pub fn on_folder_removed(&self, folder: &NormalizedPath) {
        tracing::debug!(folder = %folder, "Workspace folder removed");
    }
}
