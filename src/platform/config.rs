// Cercanos - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::ViewMode;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Cercanos data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/cercanos/)
    pub config_dir: PathBuf,

    /// Data directory holding the local storage file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Use `dir` for both configuration and data (CLI `--data-dir`).
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }

    /// Location of the persisted local storage map.
    pub fn local_storage_file(&self) -> PathBuf {
        self.data_dir.join(constants::LOCAL_STORAGE_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so an older binary can read a newer file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[roster]` section.
    pub roster: RosterSection,
    /// `[reviews]` section.
    pub reviews: ReviewsSection,
    /// `[panel]` section.
    pub panel: PanelSection,
    /// `[view]` section.
    pub view: ViewSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[roster]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RosterSection {
    /// JSON dataset replacing the built-in roster.
    pub seed_file: Option<String>,
}

/// `[reviews]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReviewsSection {
    /// Delay before a submitted review is applied, in ms.
    pub submit_delay_ms: Option<u64>,
}

/// `[panel]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PanelSection {
    /// Professional whose insurances the panel edits.
    pub professional_id: Option<String>,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// "list" or "map".
    pub default_mode: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Replacement roster dataset, if configured.
    pub roster_seed_file: Option<PathBuf>,
    /// Artificial delay before applying a submitted review (ms).
    pub review_submit_delay_ms: u64,
    /// Professional edited by the insurance panel.
    pub panel_professional_id: String,
    /// Initial presentation of search results.
    pub default_view: ViewMode,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roster_seed_file: None,
            review_submit_delay_ms: constants::DEFAULT_REVIEW_SUBMIT_DELAY_MS,
            panel_professional_id: constants::DEFAULT_PANEL_PROFESSIONAL_ID.to_string(),
            default_view: ViewMode::default(),
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and the non-fatal problems found.
/// A missing file yields defaults with no warnings (first run). An
/// unreadable or unparseable file yields defaults plus one warning, so the
/// application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            warnings.push(err);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path,
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            warnings.push(err);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Roster: seed_file (relative paths resolve against the config dir) --
    if let Some(ref file) = raw.roster.seed_file {
        if file.trim().is_empty() {
            warnings.push(out_of_range(
                "[roster] seed_file",
                file,
                "a file path; using the built-in roster",
            ));
        } else {
            let path = PathBuf::from(file);
            config.roster_seed_file = Some(if path.is_absolute() {
                path
            } else {
                config_dir.join(path)
            });
        }
    }

    // -- Reviews: submit_delay_ms --
    if let Some(delay) = raw.reviews.submit_delay_ms {
        if delay <= constants::MAX_REVIEW_SUBMIT_DELAY_MS {
            config.review_submit_delay_ms = delay;
        } else {
            warnings.push(out_of_range(
                "[reviews] submit_delay_ms",
                delay,
                format!(
                    "0-{}; using default ({})",
                    constants::MAX_REVIEW_SUBMIT_DELAY_MS,
                    constants::DEFAULT_REVIEW_SUBMIT_DELAY_MS,
                ),
            ));
        }
    }

    // -- Panel: professional_id --
    if let Some(ref id) = raw.panel.professional_id {
        if id.trim().is_empty() {
            warnings.push(out_of_range(
                "[panel] professional_id",
                id,
                format!(
                    "a non-empty ID; using default ({})",
                    constants::DEFAULT_PANEL_PROFESSIONAL_ID
                ),
            ));
        } else {
            config.panel_professional_id = id.trim().to_string();
        }
    }

    // -- View: default_mode --
    if let Some(ref mode) = raw.view.default_mode {
        match ViewMode::from_name(mode) {
            Some(view) => config.default_view = view,
            None => warnings.push(out_of_range(
                "[view] default_mode",
                mode,
                "\"list\" or \"map\"; using default (map)",
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "[logging] level",
                level,
                format!(
                    "one of {}; using default ({})",
                    constants::VALID_LOG_LEVELS.join(", "),
                    constants::DEFAULT_LOG_LEVEL,
                ),
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn out_of_range(
    field: &str,
    value: impl std::fmt::Display,
    expected: impl Into<String>,
) -> ConfigError {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) {
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config_is_applied() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[roster]
seed_file = "my_roster.json"

[reviews]
submit_delay_ms = 0

[panel]
professional_id = "4"

[view]
default_mode = "List"

[logging]
level = "DEBUG"

[unknown_section]
ignored = true
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(
            config.roster_seed_file,
            Some(dir.path().join("my_roster.json"))
        );
        assert_eq!(config.review_submit_delay_ms, 0);
        assert_eq!(config.panel_professional_id, "4");
        assert_eq!(config.default_view, ViewMode::List);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_fall_back() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[reviews]
submit_delay_ms = 60000

[panel]
professional_id = "   "

[view]
default_mode = "grid"

[logging]
level = "loud"
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert!(warnings
            .iter()
            .all(|w| matches!(w, ConfigError::ValueOutOfRange { .. })));
        assert!(warnings[0].to_string().contains("60000"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unparseable_config_warns() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[reviews\nsubmit_delay_ms = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigError::TomlParse { .. }));
    }

    #[test]
    fn test_in_dir_paths() {
        let paths = PlatformPaths::in_dir(Path::new("/tmp/cercanos"));
        assert_eq!(
            paths.local_storage_file(),
            PathBuf::from("/tmp/cercanos/local_storage.json")
        );
    }
}
