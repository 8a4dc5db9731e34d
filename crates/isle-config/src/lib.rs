//! Configuration for the island generator host.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Unknown or missing fields fall back to defaults, so older
//! and newer config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, NoiseConfig, OutputConfig, default_config_dir};
pub use error::ConfigError;
