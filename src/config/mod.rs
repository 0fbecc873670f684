//! Configuration module for render defaults
//!
//! Provides types and parsing for `creature-render.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
