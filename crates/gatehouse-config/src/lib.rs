//! Configuration system for the Gatehouse client.
//!
//! Provides TOML-based configuration with:
//! - Service endpoint and project identifier
//! - Session cache policy (`[cache]`)
//! - Config file layering (XDG user config + project-local overrides)
//! - `GATEHOUSE_*` environment variable overrides

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    load_files, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
