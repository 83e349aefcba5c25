use crate::error::{DeckError, Result};
use crate::sort::{SortDirection, StreamOrder};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// JSON library opened when no items file is given on the command line
    #[serde(default = "default_library_file")]
    pub library_file: Utf8PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Sort applied to stream listings before display
    #[serde(default)]
    pub default_order: StreamOrder,
    #[serde(default)]
    pub direction: SortDirection,
    /// Playlist opened when none is given on the command line
    pub default_playlist: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            library_file: default_library_file(),
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_library_file() -> Utf8PathBuf {
    dirs::data_dir()
        .map(|p| p.join("pipedeck/library.json"))
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("~/.local/share/pipedeck/library.json"))
}

fn default_log_level() -> String {
    "info".to_owned()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DeckError::Config(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| DeckError::Config(format!("Failed to parse config: {}", e)))?;

        config.expand_paths();
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| Self::default())
    }

    fn find_config_file() -> Result<PathBuf> {
        let candidates = [
            dirs::config_dir().map(|p| p.join("pipedeck/pipedeck.toml")),
            Some(PathBuf::from("/etc/pipedeck/pipedeck.toml")),
        ];

        for candidate in candidates.into_iter().flatten() {
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(DeckError::Config("Config file not found".to_owned()))
    }

    fn expand_paths(&mut self) {
        fn expand_tilde(path: &Utf8PathBuf) -> Utf8PathBuf {
            if let Some(rest) = path.as_str().strip_prefix("~/") {
                if let Some(home) = dirs::home_dir().and_then(|h| Utf8PathBuf::try_from(h).ok()) {
                    return home.join(rest);
                }
            }
            path.clone()
        }

        self.general.library_file = expand_tilde(&self.general.library_file);
    }

    fn validate(&self) -> Result<()> {
        let level = self.general.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(DeckError::Config(format!(
                "Unknown log level: {}",
                self.general.log_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.library.default_order, StreamOrder::Stored);
        assert_eq!(config.library.direction, SortDirection::Ascending);
        assert!(config.library.default_playlist.is_none());
        assert!(config.general.library_file.as_str().ends_with("library.json"));
    }

    #[test]
    fn test_library_section() {
        let config = Config::from_toml(
            r#"
            [library]
            default_order = "upload_date"
            direction = "descending"
            default_playlist = "4"
            "#,
        )
        .unwrap();
        assert_eq!(config.library.default_order, StreamOrder::UploadDate);
        assert_eq!(config.library.direction, SortDirection::Descending);
        assert_eq!(config.library.default_playlist.as_deref(), Some("4"));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result = Config::from_toml("[general]\nlog_level = \"loud\"\n");
        assert!(matches!(result, Err(DeckError::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(Config::from_toml("[general").is_err());
    }

    #[test]
    fn test_load_from_path_expands_tilde() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general]\nlibrary_file = \"~/pipe.json\"\nlog_level = \"debug\"").unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        if dirs::home_dir().is_some() {
            assert!(!config.general.library_file.as_str().starts_with('~'));
            assert!(config.general.library_file.as_str().ends_with("pipe.json"));
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load_from_path("/nonexistent/pipedeck.toml").is_err());
    }
}
