//! Application configuration module.
//!
//! Manages the TOML config file: EPG endpoints, dataset locations, and
//! the timezone used to interpret dates and times.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
