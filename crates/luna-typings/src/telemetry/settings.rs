//! Persisted telemetry preferences

use luna_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// Environment variable marking internal users.
pub const INTERNAL_USER_ENV_VAR: &str = "LUNA_INTERNAL";

/// Whether the user is part of the team building the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Internal,
    External,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::External => "External",
        }
    }

    /// Classify from the value of [`INTERNAL_USER_ENV_VAR`].
    pub fn detect(internal_flag: Option<&str>) -> Self {
        match internal_flag {
            Some(v) if !v.is_empty() => Self::Internal,
            _ => Self::External,
        }
    }
}

/// Telemetry settings stored as JSON in the user's config folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opt_in: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_type: Option<UserType>,
}

impl TelemetrySettings {
    /// `<config dir>/luna/telemetry-settings.json`, if a config dir exists.
    pub fn default_path() -> Option<NormalizedPath> {
        dirs::config_dir().map(|d| NormalizedPath::new(d.join("luna").join("telemetry-settings.json")))
    }

    /// Load settings; a missing or unreadable file starts over.
    pub fn load(path: &NormalizedPath) -> Self {
        match ConfigStore::new().load_if_exists::<Self>(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Ignoring unreadable telemetry settings");
                Self::default()
            }
        }
    }

    /// Load, fill in missing values, and persist any that were generated.
    pub fn load_or_init(path: &NormalizedPath) -> Result<Self> {
        let loaded = Self::load(path);
        let initialized = loaded.clone().initialize(
            std::env::var(INTERNAL_USER_ENV_VAR).ok().as_deref(),
        );
        if initialized != loaded {
            initialized.save(path)?;
        }
        Ok(initialized)
    }

    /// Settings with every field decided up front.
    pub fn initialized_with(user_id: Option<String>, opt_in: Option<bool>, user_type: Option<UserType>) -> Self {
        Self {
            user_id,
            opt_in,
            user_type,
        }
        .initialize(None)
    }

    /// Fill missing values: a fresh user id, opt-in by default, and a
    /// user type derived from `internal_flag`.
    pub fn initialize(mut self, internal_flag: Option<&str>) -> Self {
        if self.user_id.is_none() {
            self.user_id = Some(Uuid::new_v4().to_string().to_uppercase());
        }
        if self.opt_in.is_none() {
            self.opt_in = Some(true);
        }
        if self.user_type.is_none() {
            self.user_type = Some(UserType::detect(internal_flag));
        }
        self
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn opt_in(&self) -> bool {
        self.opt_in.unwrap_or(false)
    }

    pub fn set_opt_in(&mut self, opt_in: bool) {
        self.opt_in = Some(opt_in);
    }

    pub fn user_type(&self) -> UserType {
        self.user_type.unwrap_or(UserType::External)
    }

    pub fn is_internal(&self) -> bool {
        self.user_type() == UserType::Internal
    }
}
