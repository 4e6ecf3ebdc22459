//! The typings synchronizer
//!
//! Installs bundled declaration files into a project's typings folder and
//! keeps the project's reference index in step with what was installed.
//!
//! Each requested declaration is handled independently: copies run as
//! concurrent tasks and one failing entry never stops the others. Once every
//! copy has settled, the index is updated exactly once while holding the
//! project lock, so concurrent runs against the same project cannot lose
//! each other's references.

use std::sync::Arc;

use luna_fs::{LunaPath, NormalizedPath, ProjectLock, io};
use serde_json::json;

use crate::bundle::{DeclarationSource, validate_reference};
use crate::index::ReferenceIndex;
use crate::telemetry::{Telemetry, TelemetryEvent};
use crate::{Error, ProjectLocator, Result, SyncConfig};

/// What to install and where.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Folder receiving the declarations; created if absent
    pub target: NormalizedPath,
    /// Bundle-relative declaration paths
    pub relative_paths: Vec<String>,
    /// Project root, enabling user-override detection and locating the index
    pub project_root: Option<NormalizedPath>,
}

/// What to uninstall.
#[derive(Debug, Clone)]
pub struct RemoveRequest {
    pub target: NormalizedPath,
    pub relative_paths: Vec<String>,
    pub project_root: NormalizedPath,
}

/// One entry that could not be processed.
#[derive(Debug)]
pub struct EntryFailure {
    pub reference: String,
    pub error: Error,
}

/// Outcome of an install run.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Newly copied declarations, in request order
    pub installed: Vec<String>,
    /// Declarations whose destination already existed
    pub already_present: Vec<String>,
    /// Declarations skipped because the user supplies their own copy
    pub user_override: Vec<String>,
    /// Declarations that could not be installed
    pub failed: Vec<EntryFailure>,
    /// Index-relative paths appended to the reference index
    pub references_added: Vec<String>,
    /// The index file, when it was examined
    pub index_path: Option<NormalizedPath>,
    /// Failure of the index update step, if any
    pub index_error: Option<Error>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.index_error.is_none()
    }
}

/// What happened to the index during a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexOutcome {
    /// Nothing in the index mentioned the removed paths
    #[default]
    Unchanged,
    /// Matching lines were dropped and the rest written back
    Rewritten { removed_lines: usize },
    /// No lines remained, so the index file was deleted
    Deleted,
    /// The index could not be read or locked; references may be stale
    Skipped,
}

/// Outcome of a removal run.
#[derive(Debug, Default)]
pub struct RemoveReport {
    pub deleted: Vec<String>,
    pub delete_failed: Vec<EntryFailure>,
    pub index: IndexOutcome,
    pub index_error: Option<Error>,
}

/// Read-only snapshot of a project's typings.
#[derive(Debug, Clone)]
pub struct TypingsStatus {
    pub target: Option<NormalizedPath>,
    pub index_path: NormalizedPath,
    /// Bundled declarations present in the target
    pub installed: Vec<String>,
    /// Bundled declarations absent from the target
    pub missing: Vec<String>,
    /// Paths listed by the index
    pub references: Vec<String>,
    /// Index entries whose file does not exist
    pub dangling: Vec<String>,
}

enum Precheck {
    AlreadyPresent,
    UserOverride,
    Copy,
}

/// Installs and removes bundled declarations for a project.
pub struct TypingsSynchronizer {
    config: SyncConfig,
    locator: ProjectLocator,
    source: Arc<dyn DeclarationSource>,
    telemetry: Telemetry,
}

impl TypingsSynchronizer {
    pub fn new(config: SyncConfig, source: Arc<dyn DeclarationSource>, telemetry: Telemetry) -> Self {
        Self {
            locator: ProjectLocator::new(config.clone()),
            config,
            source,
            telemetry,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn locator(&self) -> &ProjectLocator {
        &self.locator
    }

    pub fn source(&self) -> &Arc<dyn DeclarationSource> {
        &self.source
    }

    /// Folder holding the reference index for a run.
    ///
    /// With a project root this is the user typings folder; without one the
    /// index sits directly in the target folder.
    fn index_dir(&self, target: &NormalizedPath, project_root: Option<&NormalizedPath>) -> NormalizedPath {
        match project_root {
            Some(root) => self.locator.user_typings_dir(root),
            None => target.clone(),
        }
    }

    /// Folder whose lock serializes index updates for a run.
    fn lock_dir(&self, target: &NormalizedPath, project_root: Option<&NormalizedPath>) -> NormalizedPath {
        match project_root {
            Some(root) => root.join(LunaPath::ConfigDir.as_str()),
            None => target.clone(),
        }
    }

    fn precheck(&self, dest: &NormalizedPath, reference: &str, project_root: Option<&NormalizedPath>) -> Precheck {
        if dest.exists() {
            return Precheck::AlreadyPresent;
        }

        if let Some(root) = project_root {
            let user_dir = self.locator.user_typings_dir(root);
            let short = user_dir.join(NormalizedPath::new(reference).file_name().unwrap_or(reference));
            let long = user_dir.join(reference);
            if short.exists() || long.exists() {
                return Precheck::UserOverride;
            }
        }

        Precheck::Copy
    }

    /// Ensure every requested declaration is present under `request.target`
    /// and referenced from the project's index.
    ///
    /// Only failure to create the target folder fails the whole call;
    /// per-entry problems are reported in [`InstallReport::failed`].
    pub async fn install(&self, request: InstallRequest) -> Result<InstallReport> {
        let event = TelemetryEvent::new("addTypings")
            .with("addedTypeDefinitions", json!(request.relative_paths));
        self.telemetry
            .record_operation(event, self.install_inner(request))
            .await
    }

    async fn install_inner(&self, request: InstallRequest) -> Result<InstallReport> {
        let InstallRequest {
            target,
            relative_paths,
            project_root,
        } = request;
        let target = anchored(target)?;
        let project_root = project_root.map(anchored).transpose()?;

        io::create_dir_all(&target).map_err(|source| Error::TargetUnavailable {
            path: target.to_native(),
            source,
        })?;

        let mut report = InstallReport::default();
        let mut pending = Vec::new();

        for relative in &relative_paths {
            let reference = match validate_reference(relative) {
                Ok(reference) => reference,
                Err(error) => {
                    tracing::warn!(reference = %relative, error = %error, "Skipping invalid declaration reference");
                    report.failed.push(EntryFailure {
                        reference: relative.clone(),
                        error,
                    });
                    continue;
                }
            };

            let dest = target.join(&reference);
            match self.precheck(&dest, &reference, project_root.as_ref()) {
                Precheck::AlreadyPresent => {
                    tracing::debug!(reference = %reference, "Declaration already installed");
                    report.already_present.push(reference);
                }
                Precheck::UserOverride => {
                    tracing::debug!(reference = %reference, "User supplies this declaration, not copying");
                    report.user_override.push(reference);
                }
                Precheck::Copy => {
                    let source = Arc::clone(&self.source);
                    let task_dest = dest.clone();
                    let task_reference = reference.clone();
                    let handle = tokio::spawn(async move {
                        source.copy_to(&task_reference, &task_dest).await
                    });
                    pending.push((reference, dest, handle));
                }
            }
        }

        // Barrier: every copy settles before the index is touched
        let mut installed_dests = Vec::new();
        for (reference, dest, handle) in pending {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(Error::TaskFailed {
                    reference: reference.clone(),
                    message: join_error.to_string(),
                }),
            };
            match outcome {
                Ok(bytes) => {
                    tracing::debug!(reference = %reference, bytes, dest = %dest, "Installed declaration");
                    report.installed.push(reference);
                    installed_dests.push(dest);
                }
                Err(error) => {
                    tracing::warn!(reference = %reference, error = %error, "Failed to install declaration");
                    report.failed.push(EntryFailure { reference, error });
                }
            }
        }

        if installed_dests.is_empty() {
            return Ok(report);
        }

        let index_dir = self.index_dir(&target, project_root.as_ref());
        let index_path = index_dir.join(&self.config.index_file);
        report.index_path = Some(index_path.clone());

        let lock_dir = self.lock_dir(&target, project_root.as_ref());
        match self
            .append_references(lock_dir, index_dir, index_path, &installed_dests)
            .await
        {
            Ok(added) => report.references_added = added,
            Err(error) => {
                tracing::error!(error = %error, "Failed to update reference index");
                report.index_error = Some(error);
            }
        }

        tracing::info!(
            installed = report.installed.len(),
            failed = report.failed.len(),
            references = report.references_added.len(),
            "Typings installed"
        );
        Ok(report)
    }

    async fn append_references(
        &self,
        lock_dir: NormalizedPath,
        index_dir: NormalizedPath,
        index_path: NormalizedPath,
        installed: &[NormalizedPath],
    ) -> Result<Vec<String>> {
        let _lock = ProjectLock::acquire_async(lock_dir, self.config.robustness()).await?;

        let mut index = match ReferenceIndex::load(index_path.clone()) {
            Ok(index) => index,
            Err(error) => {
                tracing::warn!(index = %index_path, error = %error, "Unreadable reference index, starting fresh");
                ReferenceIndex::empty(index_path)
            }
        };

        let references = installed
            .iter()
            .filter(|dest| dest.exists())
            .map(|dest| {
                dest.relative_to(&index_dir)
                    .ok_or_else(|| Error::UnrelatedIndexPath {
                        path: dest.to_native(),
                        index_dir: index_dir.to_native(),
                    })
            })
            .collect::<Result<Vec<String>>>()?;

        let added = index.append(&references);
        if !added.is_empty() {
            index.save(self.config.robustness())?;
        }
        Ok(added)
    }

    /// Delete installed declarations and drop their index references.
    ///
    /// Deletion is best-effort per file. If the index cannot be read or
    /// locked the files are still removed and the index is left alone.
    pub async fn remove(&self, request: RemoveRequest) -> Result<RemoveReport> {
        let event = TelemetryEvent::new("removeTypings")
            .with("removedTypeDefinitions", json!(request.relative_paths));
        self.telemetry
            .record_operation(event, self.remove_inner(request))
            .await
    }

    async fn remove_inner(&self, request: RemoveRequest) -> Result<RemoveReport> {
        let mut report = RemoveReport::default();
        if request.relative_paths.is_empty() {
            return Ok(report);
        }
        let request = RemoveRequest {
            target: anchored(request.target)?,
            project_root: anchored(request.project_root)?,
            ..request
        };

        let mut removed = Vec::new();
        for relative in &request.relative_paths {
            let reference = match validate_reference(relative) {
                Ok(reference) => reference,
                Err(error) => {
                    tracing::warn!(reference = %relative, error = %error, "Skipping invalid declaration reference");
                    report.delete_failed.push(EntryFailure {
                        reference: relative.clone(),
                        error,
                    });
                    continue;
                }
            };

            let path = request.target.join(&reference).to_native();
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(reference = %reference, "Removed declaration");
                    report.deleted.push(reference.clone());
                }
                Err(source) => {
                    tracing::warn!(reference = %reference, error = %source, "Failed to remove declaration");
                    report.delete_failed.push(EntryFailure {
                        reference: reference.clone(),
                        error: luna_fs::Error::io(path, source).into(),
                    });
                }
            }
            removed.push(reference);
        }

        if removed.is_empty() {
            return Ok(report);
        }

        let index_dir = self.locator.user_typings_dir(&request.project_root);
        let index_path = index_dir.join(&self.config.index_file);
        if !index_path.is_file() {
            tracing::debug!(index = %index_path, "No reference index to update");
            report.index = IndexOutcome::Skipped;
            return Ok(report);
        }

        let lock_dir = self.lock_dir(&request.target, Some(&request.project_root));
        let _lock = match ProjectLock::acquire_async(lock_dir, self.config.robustness()).await {
            Ok(lock) => lock,
            Err(error) => {
                tracing::warn!(error = %error, "Reference index is locked, leaving it unchanged");
                report.index = IndexOutcome::Skipped;
                return Ok(report);
            }
        };

        let mut index = match ReferenceIndex::load(index_path) {
            Ok(index) if index.existed() => index,
            Ok(_) => {
                report.index = IndexOutcome::Skipped;
                return Ok(report);
            }
            Err(error) => {
                tracing::warn!(error = %error, "Cannot read reference index, leaving it unchanged");
                report.index = IndexOutcome::Skipped;
                return Ok(report);
            }
        };

        let removed_lines = index.retain_without(&removed);
        let written = if index.is_empty() {
            index.delete().map(|()| IndexOutcome::Deleted)
        } else if removed_lines > 0 {
            index
                .save(self.config.robustness())
                .map(|()| IndexOutcome::Rewritten { removed_lines })
        } else {
            Ok(IndexOutcome::Unchanged)
        };

        match written {
            Ok(outcome) => report.index = outcome,
            Err(error) => {
                tracing::error!(error = %error, "Failed to rewrite reference index");
                report.index = IndexOutcome::Skipped;
                report.index_error = Some(error);
            }
        }
        Ok(report)
    }

    /// Report which bundled declarations are installed and which index
    /// references point at missing files.
    pub fn status(&self, target: Option<&NormalizedPath>, project_root: Option<&NormalizedPath>) -> Result<TypingsStatus> {
        let target = target.cloned().map(anchored).transpose()?;
        let project_root = project_root.cloned().map(anchored).transpose()?;
        let index_dir = match (&project_root, &target) {
            (Some(root), _) => self.locator.user_typings_dir(root),
            (None, Some(target)) => target.clone(),
            (None, None) => anchored(NormalizedPath::new("."))?,
        };
        let index = ReferenceIndex::load(index_dir.join(&self.config.index_file))?;

        let mut status = TypingsStatus {
            target: target.clone(),
            index_path: index.path().clone(),
            installed: Vec::new(),
            missing: Vec::new(),
            references: index.references(),
            dangling: Vec::new(),
        };

        if let Some(target) = &target {
            for reference in self.source.list() {
                if target.join(&reference).is_file() {
                    status.installed.push(reference);
                } else {
                    status.missing.push(reference);
                }
            }
        }

        status.dangling = status
            .references
            .iter()
            .filter(|r| !index_dir.join(r).is_file())
            .cloned()
            .collect();

        Ok(status)
    }
}

/// Anchor a relative request path at the current directory, so that index
/// references are always computed between two absolute paths.
fn anchored(path: NormalizedPath) -> Result<NormalizedPath> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = NormalizedPath::new(std::env::current_dir()?);
    Ok(path.absolute_from(&cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::EmbeddedBundle;
    use tempfile::TempDir;

    fn synchronizer() -> TypingsSynchronizer {
        TypingsSynchronizer::new(
            SyncConfig::default(),
            Arc::new(EmbeddedBundle::new()),
            Telemetry::disabled(),
        )
    }

    #[tokio::test]
    async fn install_without_project_root_indexes_in_target() {
        let temp = TempDir::new().unwrap();
        let target = NormalizedPath::new(temp.path().join("typings"));

        let report = synchronizer()
            .install(InstallRequest {
                target: target.clone(),
                relative_paths: vec!["luna/luna.d.ts".into()],
                project_root: None,
            })
            .await
            .unwrap();

        assert_eq!(report.installed, vec!["luna/luna.d.ts"]);
        assert_eq!(report.references_added, vec!["luna/luna.d.ts"]);
        let index = std::fs::read_to_string(target.join("luna-typings.d.ts").to_native()).unwrap();
        assert_eq!(index, r#"/// <reference path="luna/luna.d.ts"/>"#);
    }

    #[tokio::test]
    async fn invalid_reference_is_reported_not_fatal() {
        let temp = TempDir::new().unwrap();
        let target = NormalizedPath::new(temp.path());

        let report = synchronizer()
            .install(InstallRequest {
                target,
                relative_paths: vec!["../escape.d.ts".into(), "luna/luna.d.ts".into()],
                project_root: None,
            })
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].error, Error::InvalidReference { .. }));
        assert_eq!(report.installed, vec!["luna/luna.d.ts"]);
    }

    #[tokio::test]
    async fn target_that_is_a_file_fails_the_call() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("typings");
        std::fs::write(&file, "not a folder").unwrap();

        let result = synchronizer()
            .install(InstallRequest {
                target: NormalizedPath::new(&file),
                relative_paths: vec!["luna/luna.d.ts".into()],
                project_root: None,
            })
            .await;

        assert!(matches!(result, Err(Error::TargetUnavailable { .. })));
    }

    #[tokio::test]
    async fn remove_with_empty_list_does_nothing() {
        let temp = TempDir::new().unwrap();
        let report = synchronizer()
            .remove(RemoveRequest {
                target: NormalizedPath::new(temp.path()),
                relative_paths: vec![],
                project_root: NormalizedPath::new(temp.path()),
            })
            .await
            .unwrap();

        assert!(report.deleted.is_empty());
        assert_eq!(report.index, IndexOutcome::Unchanged);
    }

    #[test]
    fn anchored_keeps_absolute_and_roots_relative_paths() {
        let absolute = NormalizedPath::new("/proj/.vscode/typings");
        assert_eq!(anchored(absolute.clone()).unwrap(), absolute);

        let relative = anchored(NormalizedPath::new("../proj")).unwrap();
        assert!(relative.is_absolute());
        assert!(relative.as_str().ends_with("/proj"));
    }

    #[tokio::test]
    async fn unrelated_index_folder_is_an_error_not_a_raw_path() {
        let temp = TempDir::new().unwrap();
        let dest = NormalizedPath::new(temp.path().join("luna/luna.d.ts"));
        std::fs::create_dir_all(temp.path().join("luna")).unwrap();
        std::fs::write(dest.to_native(), "interface Luna {}").unwrap();
        let index_path = NormalizedPath::new(temp.path().join("luna-typings.d.ts"));

        let result = synchronizer()
            .append_references(
                NormalizedPath::new(temp.path()),
                NormalizedPath::new("typings"),
                index_path.clone(),
                &[dest],
            )
            .await;

        assert!(matches!(result, Err(Error::UnrelatedIndexPath { .. })));
        assert!(!index_path.exists());
    }
}
