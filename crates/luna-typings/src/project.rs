//! Project detection and well-known project locations

use luna_fs::{NormalizedPath, io};

use crate::{Error, Result, SyncConfig};

/// Resolves where a Luna project keeps its typings.
#[derive(Debug, Clone)]
pub struct ProjectLocator {
    config: SyncConfig,
}

impl ProjectLocator {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Whether the marker file exists directly under `root`.
    pub fn is_recognized_project(&self, root: &NormalizedPath) -> bool {
        root.join(&self.config.marker_file).is_file()
    }

    /// Map a workspace folder to its project root.
    ///
    /// A workspace folder is its own project root.
    pub fn project_root(&self, workspace_root: &NormalizedPath) -> NormalizedPath {
        workspace_root.clone()
    }

    /// Resolve `<root>/<editor_dir>/<project_typings_dir>`, creating it if absent.
    ///
    /// Returns `Ok(None)` when no root is given.
    pub fn get_or_create_typings_target(
        &self,
        root: Option<&NormalizedPath>,
    ) -> Result<Option<NormalizedPath>> {
        let Some(root) = root else {
            return Ok(None);
        };

        let target = self.typings_target(root);
        if !target.is_dir() {
            io::create_dir_all(&target).map_err(|source| Error::TargetUnavailable {
                path: target.to_native(),
                source,
            })?;
            tracing::debug!(target = %target, "Created typings target");
        }
        Ok(Some(target))
    }

    /// The typings target of `root`, without touching the filesystem.
    pub fn typings_target(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.config.editor_dir)
            .join(&self.config.project_typings_dir)
    }

    /// The folder where users keep their own declarations.
    pub fn user_typings_dir(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.config.user_typings_dir)
    }

    /// The reference index of the project at `root`.
    pub fn index_path(&self, root: &NormalizedPath) -> NormalizedPath {
        self.user_typings_dir(root).join(&self.config.index_file)
    }
}
