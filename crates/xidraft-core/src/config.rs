// Configuration loading and parsing (config/draft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::dataset::DataSource;
use crate::draft::engine::{BoostRule, GuaranteeRules};
use crate::draft::squad::OverwritePolicy;

const CONFIG_FILE: &str = "draft.toml";

/// Highest meaningful rating or average in a guarantee rule.
const MAX_RATING: u32 = 99;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfig,
    pub guarantee: GuaranteeRules,
    pub data_paths: DataPaths,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            draft: DraftConfig::default(),
            guarantee: GuaranteeRules::default(),
            data_paths: DataPaths {
                five_leagues: "data/players_5world.json".into(),
                all_players: "data/players_all.json".into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    draft: DraftConfig,
    #[serde(default)]
    guarantee: GuaranteeRules,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    /// Players offered per draft request.
    pub offer_size: usize,
    /// Simulated scouting time before an offer is shown.
    pub scouting_delay_ms: u64,
    /// Catalog loaded at startup.
    pub default_source: DataSource,
    /// Return a replaced slot occupant to the draftable pool.
    #[serde(default)]
    pub release_replaced_players: bool,
    /// Fixed RNG seed for reproducible sessions. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DraftConfig {
    pub fn scouting_delay(&self) -> Duration {
        Duration::from_millis(self.scouting_delay_ms)
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        if self.release_replaced_players {
            OverwritePolicy::ReleasePrevious
        } else {
            OverwritePolicy::RetainUsed
        }
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            offer_size: 3,
            scouting_delay_ms: 300,
            default_source: DataSource::FiveLeagues,
            release_replaced_players: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub five_leagues: String,
    pub all_players: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/draft.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: DraftFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        draft: file.draft,
        guarantee: file.guarantee,
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/draft.toml` from `defaults/draft.toml` when it is missing.
///
/// Returns the path written, or `None` when a config file already exists. An
/// existing file is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if !default.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} and no defaults/{CONFIG_FILE} in {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default.display(), target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_err)?;
    }
    std::fs::copy(&default, &target).map_err(copy_err)?;
    info!("Created {} from defaults", target.display());

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draft.offer_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.offer_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    let g = &config.guarantee;
    if g.base_threshold > MAX_RATING {
        return Err(ConfigError::ValidationError {
            field: "guarantee.base_threshold".into(),
            message: format!("must be <= {MAX_RATING}, got {}", g.base_threshold),
        });
    }
    validate_boost("guarantee.boost", &g.boost)?;
    validate_boost("guarantee.second_boost", &g.second_boost)?;

    let paths: &[(&str, &str)] = &[
        ("data_paths.five_leagues", &config.data_paths.five_leagues),
        ("data_paths.all_players", &config.data_paths.all_players),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

fn validate_boost(prefix: &str, rule: &BoostRule) -> Result<(), ConfigError> {
    let fields: &[(&str, u32)] = &[
        ("max_average", rule.max_average),
        ("threshold", rule.threshold),
    ];
    for (name, val) in fields {
        if *val > MAX_RATING {
            return Err(ConfigError::ValidationError {
                field: format!("{prefix}.{name}"),
                message: format!("must be <= {MAX_RATING}, got {val}"),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, whether `cargo test` runs from the crate or the workspace.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with `config/draft.toml` holding `text`.
    fn temp_config(name: &str, text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/draft.toml"), text).unwrap();
        tmp
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults/draft.toml")).unwrap()
    }

    #[test]
    fn load_default_config() {
        let tmp = temp_config("xidraft_config_defaults", &default_text());
        let config = load_config_from(&tmp).expect("should load default config");

        assert_eq!(config.draft.offer_size, 3);
        assert_eq!(config.draft.scouting_delay(), Duration::from_millis(300));
        assert_eq!(config.draft.default_source, DataSource::FiveLeagues);
        assert!(!config.draft.release_replaced_players);
        assert_eq!(config.draft.overwrite_policy(), OverwritePolicy::RetainUsed);
        assert!(config.draft.seed.is_none());

        assert_eq!(config.guarantee.base_threshold, 80);
        assert_eq!(config.guarantee.boost.min_squad_size, 3);
        assert_eq!(config.guarantee.boost.max_average, 83);
        assert_eq!(config.guarantee.boost.threshold, 85);
        assert_eq!(config.guarantee.second_boost.min_squad_size, 6);
        assert_eq!(config.guarantee.second_boost.max_average, 81);
        assert_eq!(config.guarantee.second_boost.threshold, 80);

        assert_eq!(config.data_paths.five_leagues, "data/players_5world.json");
        assert_eq!(config.data_paths.all_players, "data/players_all.json");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_guarantee_section_uses_defaults() {
        let text = r#"
[draft]
offer_size = 4
scouting_delay_ms = 0
default_source = "all"
seed = 7

[data_paths]
five_leagues = "a.json"
all_players = "b.csv"
"#;
        let tmp = temp_config("xidraft_config_no_guarantee", text);
        let config = load_config_from(&tmp).expect("should load");
        assert_eq!(config.draft.offer_size, 4);
        assert_eq!(config.draft.default_source, DataSource::AllPlayers);
        assert_eq!(config.draft.seed, Some(7));
        assert_eq!(config.guarantee.base_threshold, 80);
        assert_eq!(config.guarantee.boost.threshold, 85);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn release_flag_selects_policy() {
        let text = default_text().replace(
            "release_replaced_players = false",
            "release_replaced_players = true",
        );
        let tmp = temp_config("xidraft_config_release", &text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.draft.overwrite_policy(), OverwritePolicy::ReleasePrevious);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_offer_size() {
        let text = default_text().replace("offer_size = 3", "offer_size = 0");
        let tmp = temp_config("xidraft_config_zero_offer", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "draft.offer_size");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_threshold_above_max_rating() {
        let text = default_text().replace("threshold = 85", "threshold = 120");
        let tmp = temp_config("xidraft_config_threshold", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "guarantee.boost.threshold");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_data_path() {
        let text = default_text().replace(
            "all_players = \"data/players_all.json\"",
            "all_players = \"  \"",
        );
        let tmp = temp_config("xidraft_config_empty_path", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "data_paths.all_players");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_source() {
        let text = default_text().replace("default_source = \"5world\"", "default_source = \"moon\"");
        let tmp = temp_config("xidraft_config_bad_source", &text);
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("xidraft_config_invalid", "this is not valid [[[ toml");
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("draft.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_draft_toml() {
        let tmp = std::env::temp_dir().join("xidraft_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("draft.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_copies_default() {
        let tmp = std::env::temp_dir().join("xidraft_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/draft.toml"), default_text()).unwrap();

        let copied = ensure_config_file(&tmp).expect("should succeed");
        assert_eq!(copied, Some(tmp.join("config/draft.toml")));
        assert_eq!(
            fs::read_to_string(tmp.join("config/draft.toml")).unwrap(),
            default_text()
        );
        assert!(load_config_from(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_keeps_existing() {
        let tmp = std::env::temp_dir().join("xidraft_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults/draft.toml"), default_text()).unwrap();
        fs::write(tmp.join("config/draft.toml"), "# custom\n").unwrap();

        assert_eq!(ensure_config_file(&tmp).expect("should succeed"), None);
        let content = fs::read_to_string(tmp.join("config/draft.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_errors_without_defaults() {
        let tmp = std::env::temp_dir().join("xidraft_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_file(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("no config/draft.toml"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
