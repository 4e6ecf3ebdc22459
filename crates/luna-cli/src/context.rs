//! Shared command context
//!
//! Resolves the global flags (config, bundle, telemetry settings) into the
//! collaborators a command needs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use luna_fs::{LunaPath, NormalizedPath};
use luna_typings::telemetry::TracingSink;
use luna_typings::{
    DeclarationSource, DirectoryBundle, EmbeddedBundle, PluginTypings, SyncConfig, Telemetry,
    TelemetrySettings, TypingsSynchronizer,
};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// File name of the plugin mapping inside a bundle folder.
const PLUGIN_MAPPING_FILE: &str = "plugin-typings.json";

/// Path flags are stored already resolved against the current directory.
#[derive(Debug, Clone, Default)]
pub struct LunaContext {
    config: Option<NormalizedPath>,
    bundle: Option<NormalizedPath>,
    telemetry_settings: Option<NormalizedPath>,
}

impl LunaContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let resolve = |flag: &Option<PathBuf>| flag.as_deref().map(resolve_dir).transpose();
        Ok(Self {
            config: resolve(&cli.config)?,
            bundle: resolve(&cli.bundle)?,
            telemetry_settings: resolve(&cli.telemetry_settings)?,
        })
    }

    /// Explicit `--config` wins, then `<root>/.luna/config.toml`, then defaults.
    pub fn config_for(&self, root: Option<&NormalizedPath>) -> Result<SyncConfig> {
        if let Some(path) = &self.config {
            return Ok(SyncConfig::load(path)?);
        }
        match root {
            Some(root) => Ok(SyncConfig::discover(root)?),
            None => Ok(SyncConfig::default()),
        }
    }

    /// `--bundle`, else a `LunaTypings` folder shipped next to the binary.
    fn bundle_dir(&self) -> Option<NormalizedPath> {
        self.bundle.clone().or_else(|| {
            let exe = std::env::current_exe().ok()?;
            let shipped = exe.parent()?.join(LunaPath::BundleDir.as_str());
            shipped.is_dir().then(|| NormalizedPath::new(shipped))
        })
    }

    /// Declarations from the bundle folder, or the ones built into luna.
    pub fn source(&self) -> Arc<dyn DeclarationSource> {
        match self.bundle_dir() {
            Some(dir) => {
                tracing::debug!(bundle = %dir, "Using bundle folder");
                Arc::new(DirectoryBundle::new(dir))
            }
            None => Arc::new(EmbeddedBundle::new()),
        }
    }

    /// Plugin mapping of the active bundle; `None` if it cannot be loaded.
    pub fn plugin_typings(&self) -> Option<PluginTypings> {
        match self.bundle_dir() {
            Some(dir) => PluginTypings::load_or_log(&dir.join(PLUGIN_MAPPING_FILE)),
            None => match PluginTypings::embedded() {
                Ok(mapping) => Some(mapping),
                Err(e) => {
                    tracing::error!(error = %e, "Embedded plugin typings mapping is invalid");
                    None
                }
            },
        }
    }

    pub fn settings_path(&self) -> Result<NormalizedPath> {
        match &self.telemetry_settings {
            Some(path) => Ok(path.clone()),
            None => TelemetrySettings::default_path()
                .ok_or_else(|| CliError::user("No user config directory for telemetry settings")),
        }
    }

    pub fn telemetry(&self, config: &SyncConfig) -> Telemetry {
        if !config.telemetry {
            return Telemetry::disabled();
        }
        let Ok(path) = self.settings_path() else {
            return Telemetry::disabled();
        };
        let settings = match TelemetrySettings::load_or_init(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Could not persist telemetry settings");
                TelemetrySettings::load(&path)
            }
        };
        Telemetry::new(Arc::new(TracingSink), settings)
    }

    pub fn synchronizer(&self, root: Option<&NormalizedPath>) -> Result<TypingsSynchronizer> {
        let config = self.config_for(root)?;
        let telemetry = self.telemetry(&config);
        Ok(TypingsSynchronizer::new(config, self.source(), telemetry))
    }
}

/// Absolute form of `path` (a directory or file), resolved against the
/// current directory.
pub fn resolve_dir(path: &Path) -> Result<NormalizedPath> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let resolved = dunce::canonicalize(&absolute).unwrap_or(absolute);
    Ok(NormalizedPath::new(resolved))
}

/// `--project` if given, else the current directory.
pub fn project_or_cwd(project: Option<&Path>) -> Result<NormalizedPath> {
    resolve_dir(project.unwrap_or_else(|| Path::new(".")))
}
