//! Config file location.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// Per-application directory under the config home.
const APP_DIR: &str = "clarotv";

/// Resolves the config file path.
///
/// - `--dir` given: `{dir}/config.toml`.
/// - Otherwise `$XDG_CONFIG_HOME/clarotv/config.toml`, falling back to
///   `~/.config/clarotv/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable
/// (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE_NAME));
    }

    let base = config_home(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Picks the config home. A relative `XDG_CONFIG_HOME` is ignored, as the
/// XDG base directory rules require.
fn config_home(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_config_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
    {
        return Ok(xdg);
    }

    let home = home
        .filter(|h| !h.is_empty())
        .context("neither XDG_CONFIG_HOME nor HOME is set")?;
    Ok(Path::new(&home).join(".config"))
}
