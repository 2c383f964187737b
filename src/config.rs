//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/npshuffle/npshuffle.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `NPSHUFFLE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::rephraser::DEFAULT_LIMIT;
use crate::application::ApplicationError;
use crate::domain::CoordinationRules;

/// Default column width for printed trees.
pub const DEFAULT_MARGIN: usize = 70;

/// Raw coordination rules for intermediate parsing (Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRules {
    pub phrase_label: Option<String>,
    pub separator_labels: Option<Vec<String>>,
    pub min_children: Option<usize>,
    pub min_phrases: Option<usize>,
    pub min_separators: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub limit: Option<usize>,
    pub seed: Option<u64>,
    pub margin: Option<usize>,
    pub rules: RawRules,
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&[",", "CC"], &[":"])       // → [",", ":", "CC"]
/// merge_array(&[",", "CC"], &["!,", ":"]) // → [":", "CC"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for pattern in overlay {
        if let Some(negated) = pattern.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(pattern.clone());
        }
    }

    // Convert to sorted Vec for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

fn merge_rules(base: &CoordinationRules, overlay: &RawRules) -> CoordinationRules {
    CoordinationRules {
        phrase_label: overlay
            .phrase_label
            .clone()
            .unwrap_or_else(|| base.phrase_label.clone()),
        separator_labels: overlay
            .separator_labels
            .as_ref()
            .map(|o| merge_array(&base.separator_labels, o))
            .unwrap_or_else(|| base.separator_labels.clone()),
        min_children: overlay.min_children.unwrap_or(base.min_children),
        min_phrases: overlay.min_phrases.unwrap_or(base.min_phrases),
        min_separators: overlay.min_separators.unwrap_or(base.min_separators),
    }
}

// Like merge_rules, but arrays REPLACE instead of union.
fn apply_global_rules(base: &CoordinationRules, global: &RawRules) -> CoordinationRules {
    CoordinationRules {
        separator_labels: global
            .separator_labels
            .clone()
            .unwrap_or_else(|| base.separator_labels.clone()),
        ..merge_rules(base, &RawRules {
            separator_labels: None,
            ..global.clone()
        })
    }
}

/// Unified configuration for npshuffle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of paraphrases per tree (default: 20)
    pub limit: usize,
    /// Seed for sampling; fresh entropy per run when unset
    pub seed: Option<u64>,
    /// Column width for printed trees (default: 70)
    pub margin: usize,
    /// Labels that define a coordination
    pub rules: CoordinationRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            seed: None,
            margin: DEFAULT_MARGIN,
            rules: CoordinationRules::default(),
        }
    }
}

/// Get the XDG config directory for npshuffle.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "npshuffle").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("npshuffle.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base) with union semantics for arrays.
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays (separator labels): union merge with negation support
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            limit: overlay.limit.unwrap_or(self.limit),
            seed: overlay.seed.or(self.seed),
            margin: overlay.margin.unwrap_or(self.margin),
            rules: merge_rules(&self.rules, &overlay.rules),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Unlike `merge_with()` which uses union semantics, this method replaces
    /// arrays entirely if the global config specifies them.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            limit: global.limit.unwrap_or(self.limit),
            seed: global.seed.or(self.seed),
            margin: global.margin.unwrap_or(self.margin),
            rules: apply_global_rules(&self.rules, &global.rules),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file (`--config`)
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/npshuffle/npshuffle.toml` (arrays REPLACE defaults)
    /// 3. Explicit config file (arrays UNION with global, `!` removes)
    /// 4. Environment variables: `NPSHUFFLE_*` prefix (REPLACES - explicit override)
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Load global config (REPLACES defaults)
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Explicit file must exist when given
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Apply environment variables (replaces - explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Load only compiled defaults plus one config file, ignoring global config and env vars.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let settings = Self::default().merge_with(&raw);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply NPSHUFFLE_* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge) - they are explicit user overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("NPSHUFFLE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("rules.separator_labels")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<usize>("limit") {
            settings.limit = val;
        }
        if let Ok(val) = config.get::<u64>("seed") {
            settings.seed = Some(val);
        }
        if let Ok(val) = config.get::<usize>("margin") {
            settings.margin = val;
        }
        if let Ok(val) = config.get_string("rules.phrase_label") {
            settings.rules.phrase_label = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("rules.separator_labels") {
            settings.rules.separator_labels = val;
        }
        if let Ok(val) = config.get::<usize>("rules.min_children") {
            settings.rules.min_children = val;
        }
        if let Ok(val) = config.get::<usize>("rules.min_phrases") {
            settings.rules.min_phrases = val;
        }
        if let Ok(val) = config.get::<usize>("rules.min_separators") {
            settings.rules.min_separators = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.limit == 0 {
            return Err(ApplicationError::Config {
                message: "limit must be greater than 0".into(),
            });
        }
        if self.rules.phrase_label.is_empty() {
            return Err(ApplicationError::Config {
                message: "rules.phrase_label must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Render as TOML for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
