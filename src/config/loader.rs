//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.revanchor.toml` in repo root
//! 4. `~/.config/revanchor/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::warn;

use crate::assemble::Limits;
use crate::constants::{
    DEFAULT_BOT_MARKER, DEFAULT_TIMEOUT_SECS, ENV_EXTENSIONS, ENV_GITHUB_API_URL,
    ENV_MAX_BODY_CHARS, ENV_MAX_COMMENTS, ENV_RULES, GITHUB_API_URL,
};
use crate::document::DocumentLayout;
use crate::env::Env;
use crate::rules::{Rule, RuleSet};

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    pub document: DocumentLayout,
    pub review: ReviewConfig,
    pub rules: RulesConfig,
    pub github: GithubConfig,
}

/// Which changed files are reviewed and how synthesized lines are tagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Accepted path suffixes; empty accepts every file.
    pub extensions: Vec<String>,
    pub bot_marker: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            extensions: vec![".py".to_string()],
            bot_marker: DEFAULT_BOT_MARKER.to_string(),
        }
    }
}

/// Built-in rule checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub enabled: bool,
    /// Rule ids to switch off.
    pub disabled: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled: Vec::new(),
        }
    }
}

impl RulesConfig {
    pub fn rule_set(&self) -> RuleSet {
        if self.enabled {
            RuleSet::without(&self.disabled)
        } else {
            RuleSet::none()
        }
    }
}

/// GitHub REST settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: GITHUB_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, repo-local config, then applies
    /// environment variable overrides. CLI flags are applied by the caller.
    pub fn load(repo_root: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::load_file(&global_path)?);
            }
        }

        // Layer 3: repo-local config
        if let Some(root) = repo_root {
            let local_path = root.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                config.merge(Self::load_file(&local_path)?);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        config.limits = config.limits.clamped();
        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let defaults = Config::default();

        if other.limits.max_body_chars != defaults.limits.max_body_chars {
            self.limits.max_body_chars = other.limits.max_body_chars;
        }
        if other.limits.max_comments != defaults.limits.max_comments {
            self.limits.max_comments = other.limits.max_comments;
        }

        if other.document.file_heading_level != defaults.document.file_heading_level {
            self.document.file_heading_level = other.document.file_heading_level;
        }
        if other.document.part_heading_level != defaults.document.part_heading_level {
            self.document.part_heading_level = other.document.part_heading_level;
        }

        if other.review.extensions != defaults.review.extensions {
            self.review.extensions = other.review.extensions;
        }
        if other.review.bot_marker != defaults.review.bot_marker {
            self.review.bot_marker = other.review.bot_marker;
        }

        // Disabling wins over enabling
        if !other.rules.enabled {
            self.rules.enabled = false;
        }
        for id in other.rules.disabled {
            if !self.rules.disabled.contains(&id) {
                self.rules.disabled.push(id);
            }
        }

        if other.github.api_url != defaults.github.api_url {
            self.github.api_url = other.github.api_url;
        }
        if other.github.timeout_secs != defaults.github.timeout_secs {
            self.github.timeout_secs = other.github.timeout_secs;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(n) = parse_count(env, ENV_MAX_COMMENTS) {
            self.limits.max_comments = n;
        }
        if let Some(n) = parse_count(env, ENV_MAX_BODY_CHARS) {
            self.limits.max_body_chars = n;
        }
        if let Some(exts) = env.list(ENV_EXTENSIONS) {
            self.review.extensions = exts;
        }
        if let Some(val) = env.get(ENV_GITHUB_API_URL) {
            self.github.api_url = val;
        }

        // Either "none" or the ids of the rules to run
        if let Some(ids) = env.list(ENV_RULES) {
            match ids.as_slice() {
                [only] if matches!(only.to_lowercase().as_str(), "none" | "off" | "false") => {
                    self.rules.enabled = false;
                }
                _ => {
                    self.rules.enabled = true;
                    self.rules.disabled = Rule::iter()
                        .map(|r| r.id().to_string())
                        .filter(|id| !ids.contains(id))
                        .collect();
                }
            }
        }
    }
}

/// A numeric variable; a set but unparsable value is reported and ignored.
fn parse_count(env: &Env, name: &str) -> Option<usize> {
    let parsed = env.parse(name);
    if parsed.is_none() {
        if let Some(val) = env.get(name) {
            warn!("ignoring invalid {name} value: {val}");
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_env() -> Env {
        Env::mock(Vec::<(&str, &str)>::new())
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_body_chars, 65_000);
        assert_eq!(config.limits.max_comments, 50);
        assert_eq!(config.document.file_heading_level, 2);
        assert_eq!(config.review.extensions, vec![".py"]);
        assert_eq!(config.review.bot_marker, "review-bot");
        assert!(config.rules.enabled);
        assert_eq!(config.github.timeout_secs, 30);
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[limits]
max_comments = 20

[document]
part_heading_level = 4

[review]
extensions = [".py", ".pyi"]

[rules]
disabled = ["broad-except"]

[github]
api_url = "https://ghe.example.com/api/v3"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.limits.max_comments, 20);
        assert_eq!(config.limits.max_body_chars, 65_000);
        assert_eq!(config.document.part_heading_level, 4);
        assert_eq!(config.document.file_heading_level, 2);
        assert_eq!(config.review.extensions, vec![".py", ".pyi"]);
        assert_eq!(config.rules.disabled, vec!["broad-except"]);
        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.rules.rule_set().rules().len(), 4);
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();
        other.limits.max_comments = 10;
        other.review.bot_marker = "bot".into();
        other.rules.disabled = vec!["unsafe-eval".into()];
        other.github.timeout_secs = 5;

        base.merge(other);

        assert_eq!(base.limits.max_comments, 10);
        assert_eq!(base.review.bot_marker, "bot");
        assert_eq!(base.rules.disabled, vec!["unsafe-eval"]);
        assert_eq!(base.github.timeout_secs, 5);
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.limits.max_comments = 7;
        base.rules.enabled = false;

        base.merge(Config::default());

        assert_eq!(base.limits.max_comments, 7);
        assert!(!base.rules.enabled);
    }

    #[test]
    fn load_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();
        assert!(Config::load_file(&path).unwrap_err().to_string().contains("parse"));

        let missing = Config::load_file(Path::new("/tmp/revanchor_not_exist_config.toml"));
        assert!(missing.unwrap_err().to_string().contains("read"));
    }

    #[test]
    fn load_from_repo_root_clamps_limits() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".revanchor.toml"),
            "[limits]\nmax_comments = 500\nmax_body_chars = 1000\n",
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &no_env()).unwrap();
        assert_eq!(config.limits.max_comments, 50);
        assert_eq!(config.limits.max_body_chars, 1000);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".revanchor.toml"), "[limits]\nmax_comments = 20\n").unwrap();
        let env = Env::mock([
            (ENV_MAX_COMMENTS, "5"),
            (ENV_EXTENSIONS, ".py, .rs"),
            (ENV_GITHUB_API_URL, "http://localhost:8080"),
        ]);

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.limits.max_comments, 5);
        assert_eq!(config.review.extensions, vec![".py", ".rs"]);
        assert_eq!(config.github.api_url, "http://localhost:8080");
    }

    #[test]
    fn invalid_env_number_is_ignored() {
        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([(ENV_MAX_BODY_CHARS, "lots")]));
        assert_eq!(config.limits.max_body_chars, 65_000);
    }

    #[test]
    fn env_rules_selects_or_disables() {
        let mut config = Config::default();
        config.apply_env_vars(&Env::mock([(ENV_RULES, "unsafe-eval,broad-except")]));
        let ids: Vec<_> = config.rules.rule_set().rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["unsafe-eval", "broad-except"]);

        config.apply_env_vars(&Env::mock([(ENV_RULES, "none")]));
        assert!(config.rules.rule_set().is_empty());
    }

    #[test]
    fn global_config_path_mentions_app() {
        if let Some(p) = Config::global_config_path() {
            assert!(p.to_string_lossy().contains("revanchor"));
        }
    }
}
