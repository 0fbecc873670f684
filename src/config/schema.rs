//! Configuration schema types for `creature-render.toml`
//!
//! Defines the structure and validation rules for render defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::variant::GameVariant;

/// Default render settings, overridden by command-line flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Game to render for when `--game` is absent (C1, C2, CV, C3, DS)
    #[serde(default)]
    pub game: Option<String>,
    /// Scale factor, 1-10
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Padding around the rendered image in pixels
    #[serde(default)]
    pub padding: Option<u32>,
    /// Trim transparent borders before padding
    #[serde(default)]
    pub trim: bool,
    /// Fail instead of substituting sprites of another age or gender
    #[serde(default)]
    pub exact_match: bool,
    /// Always number output files, skipping names that exist
    #[serde(default)]
    pub increment: bool,
    /// Keep limbs from rendering both above and below one another
    #[serde(default)]
    pub no_intersect: bool,
    /// Alpha for `--ghost` parts, 0.0-1.0
    #[serde(default)]
    pub ghost_alpha: Option<f64>,
    /// Seed for every random choice
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_scale() -> u32 {
    1
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            game: None,
            scale: default_scale(),
            padding: None,
            trim: false,
            exact_match: false,
            increment: false,
            no_intersect: false,
            ghost_alpha: None,
            seed: None,
        }
    }
}

/// Extra sprite source folders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Folders, files or globs appended to the command-line sources
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// Complete `creature-render.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Validation error for configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "defaults.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl RenderConfig {
    /// Validate the configuration and return all errors found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if let Some(game) = &self.defaults.game {
            if game.parse::<GameVariant>().is_err() {
                errors.push(ConfigValidationError {
                    field: "defaults.game".to_string(),
                    message: format!("unknown game '{}', expected C1, C2, CV, C3 or DS", game),
                });
            }
        }

        if !(1..=10).contains(&self.defaults.scale) {
            errors.push(ConfigValidationError {
                field: "defaults.scale".to_string(),
                message: "must be between 1 and 10".to_string(),
            });
        }

        if let Some(alpha) = self.defaults.ghost_alpha {
            if !(0.0..=1.0).contains(&alpha) {
                errors.push(ConfigValidationError {
                    field: "defaults.ghost_alpha".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }

        for (i, path) in self.sources.paths.iter().enumerate() {
            if path.as_os_str().is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("sources.paths[{}]", i),
                    message: "must be a non-empty path".to_string(),
                });
            }
        }

        errors
    }

    /// The configured default game, if set and valid.
    pub fn game(&self) -> Option<GameVariant> {
        self.defaults.game.as_deref().and_then(|g| g.parse().ok())
    }
}
