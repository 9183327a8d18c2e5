//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dirtree/dirtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `DIRTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::{ListStyle, MoveStrategy, TreeOptions, DEFAULT_INDENT_WIDTH};
use crate::application::ApplicationError;
use crate::domain::CollisionPolicy;

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "DIRTREE";

/// Raw settings for intermediate parsing (everything optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub quit_token: Option<String>,
    pub prompt: Option<String>,
    pub verbose: Option<bool>,
    pub list_style: Option<ListStyle>,
    pub indent_width: Option<usize>,
    pub collision: Option<CollisionPolicy>,
    pub move_strategy: Option<MoveStrategy>,
}

/// Unified configuration for dirtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Line that ends an interactive session (default: "x")
    pub quit_token: String,
    /// Prompt printed before each line in interactive mode (empty: none)
    pub prompt: String,
    /// Report successful mutations
    pub verbose: bool,
    /// Listing style: "indent" or "tree"
    pub list_style: ListStyle,
    /// Spaces per depth level for the indent style
    pub indent_width: usize,
    /// Name collision on move: "keep-existing", "overwrite" or "reject"
    pub collision: CollisionPolicy,
    /// Move phase order: "resolve-target-first" or "detach-first"
    pub move_strategy: MoveStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quit_token: "x".into(),
            prompt: String::new(),
            verbose: false,
            list_style: ListStyle::default(),
            indent_width: DEFAULT_INDENT_WIDTH,
            collision: CollisionPolicy::default(),
            move_strategy: MoveStrategy::default(),
        }
    }
}

/// Get the XDG config directory for dirtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dirtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dirtree.toml"))
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
    /// Options handed to the tree service.
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            collision: self.collision,
            move_strategy: self.move_strategy,
            list_style: self.list_style,
            indent_width: self.indent_width,
        }
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            quit_token: overlay
                .quit_token
                .clone()
                .unwrap_or_else(|| self.quit_token.clone()),
            prompt: overlay.prompt.clone().unwrap_or_else(|| self.prompt.clone()),
            verbose: overlay.verbose.unwrap_or(self.verbose),
            list_style: overlay.list_style.unwrap_or(self.list_style),
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            collision: overlay.collision.unwrap_or(self.collision),
            move_strategy: overlay.move_strategy.unwrap_or(self.move_strategy),
        }
    }

    /// Load settings from all layers.
    ///
    /// `explicit` must exist when given; the global file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), explicit)
    }

    /// Load settings from the given files plus environment overrides.
    pub fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, skipped when absent
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Explicit config file, must exist
        if let Some(path) = explicit {
            debug!("loading config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        let env = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;
        current = current.apply_overrides(&env)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply explicit overrides (environment variables) on top of self.
    ///
    /// Overrides replace values; unparsable values are errors.
    pub fn apply_overrides(mut self, config: &Config) -> Result<Self, ApplicationError> {
        if let Ok(val) = config.get_string("quit_token") {
            self.quit_token = val;
        }
        if let Ok(val) = config.get_string("prompt") {
            self.prompt = val;
        }
        if let Ok(val) = config.get_string("verbose") {
            self.verbose = parse_bool("verbose", &val)?;
        }
        if let Ok(val) = config.get_string("list_style") {
            self.list_style = val.parse().map_err(invalid("list_style"))?;
        }
        if let Ok(val) = config.get_string("indent_width") {
            self.indent_width = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("indent_width: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("collision") {
            self.collision = val.parse().map_err(invalid("collision"))?;
        }
        if let Ok(val) = config.get_string("move_strategy") {
            self.move_strategy = val.parse().map_err(invalid("move_strategy"))?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.quit_token.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "quit_token must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Commented config file with every key at its default.
    pub fn template() -> String {
        r#"# dirtree configuration
# Global location: $XDG_CONFIG_HOME/dirtree/dirtree.toml
# Every key can be overridden with DIRTREE_<KEY>, e.g. DIRTREE_LIST_STYLE=tree

# Line that ends an interactive session
# quit_token = "x"

# Prompt printed before each line (empty: none)
# prompt = ""

# Report successful create/delete/move
# verbose = false

# Listing style: "indent" or "tree"
# list_style = "indent"

# Spaces per level for the indent style
# indent_width = 2

# Moving onto an existing name: "keep-existing", "overwrite" or "reject"
# collision = "keep-existing"

# Move phase order: "resolve-target-first" or "detach-first"
# detach-first drops the moved folder when the target does not exist
# move_strategy = "resolve-target-first"
"#
        .to_string()
    }
}

fn parse_bool(key: &str, val: &str) -> Result<bool, ApplicationError> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ApplicationError::Config {
            message: format!("{key}: expected a boolean, got '{other}'"),
        }),
    }
}

fn invalid(key: &'static str) -> impl Fn(String) -> ApplicationError {
    move |message| ApplicationError::Config {
        message: format!("{key}: {message}"),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
