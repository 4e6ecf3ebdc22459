//! Settings files in TOML, JSON or YAML
//!
//! Synchronizer config, the plugin mapping and telemetry settings all go
//! through [`ConfigStore`]; the extension of the file picks the format.

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn of(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Render `value`; JSON gets a trailing newline so hand edits diff cleanly.
    fn render<T: Serialize>(self, value: &T) -> std::result::Result<String, String> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value)
                .map(|json| json + "\n")
                .map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
    }
}

/// Reads and writes settings files, choosing the format by extension
/// (`.toml`, `.json`, `.yaml` or `.yml`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and deserialize `path`. A missing file is an error.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = Format::of(path)?;
        let content = io::read_text(path)?;
        Self::decode(path, format, &content)
    }

    /// Like [`ConfigStore::load`], but a missing file is `None`.
    pub fn load_if_exists<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<Option<T>> {
        let format = Format::of(path)?;
        match io::read_text_if_exists(path)? {
            Some(content) => Self::decode(path, format, &content).map(Some),
            None => Ok(None),
        }
    }

    /// Serialize `value` and replace `path` atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = Format::of(path)?;
        let content = format.render(value).map_err(|message| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.name().into(),
            message,
        })?;
        io::write_text(path, &content)
    }

    fn decode<T: DeserializeOwned>(path: &NormalizedPath, format: Format, content: &str) -> Result<T> {
        format.parse(content).map_err(|message| Error::ConfigParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension_case_insensitively() {
        assert_eq!(Format::of(&NormalizedPath::new("a/luna.TOML")).unwrap(), Format::Toml);
        assert_eq!(Format::of(&NormalizedPath::new("settings.json")).unwrap(), Format::Json);
        assert_eq!(Format::of(&NormalizedPath::new("x.yml")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::of(&NormalizedPath::new("luna")),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn json_render_ends_with_newline() {
        let rendered = Format::Json.render(&serde_json::json!({"optIn": true})).unwrap();
        assert!(rendered.ends_with("}\n"));
    }
}
