//! Configuration loading and discovery for `creature-render.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::RenderConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::variant::GameVariant;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "creature-render.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse creature-render.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub game: Option<GameVariant>,
    pub scale: Option<u32>,
    pub padding: Option<u32>,
    pub ghost_alpha: Option<f64>,
    pub seed: Option<u64>,
    /// Flags only ever switch a setting on
    pub trim: bool,
    pub exact_match: bool,
    pub increment: bool,
    pub no_intersect: bool,
}

/// Find `creature-render.toml` by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for `creature-render.toml`
/// 2. Check `XDG_CONFIG_HOME/creature-render/creature-render.toml`
///    (or `~/.config/creature-render/creature-render.toml`)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find the config file in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("creature-render").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find the config file by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<RenderConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(RenderConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: RenderConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    // Source paths are relative to the file that names them
    if let Some(root) = path.parent() {
        config.sources.paths =
            config.sources.paths.iter().map(|p| resolve_path(root, p)).collect();
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut RenderConfig, overrides: &CliOverrides) {
    if let Some(game) = overrides.game {
        config.defaults.game = Some(game.to_string());
    }
    if let Some(scale) = overrides.scale {
        config.defaults.scale = scale;
    }
    if let Some(padding) = overrides.padding {
        config.defaults.padding = Some(padding);
    }
    if let Some(alpha) = overrides.ghost_alpha {
        config.defaults.ghost_alpha = Some(alpha);
    }
    if let Some(seed) = overrides.seed {
        config.defaults.seed = Some(seed);
    }

    config.defaults.trim |= overrides.trim;
    config.defaults.exact_match |= overrides.exact_match;
    config.defaults.increment |= overrides.increment;
    config.defaults.no_intersect |= overrides.no_intersect;
}

/// Resolve a path relative to the config file's directory.
///
/// Absolute paths and paths starting with `~` are returned unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || path.starts_with("~") {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
