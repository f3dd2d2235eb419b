// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{Config, RawConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that commands and project paths are non-empty.
///
/// A missing config file is not an error: all sections default, so the
/// orchestrator can run against a fresh working directory with no config at
/// all.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let raw = if path.exists() {
        load_from_path(path)?
    } else {
        RawConfig {
            project: Default::default(),
            simulation: Default::default(),
            report: Default::default(),
        }
    };
    let config = Config::try_from(raw)?;
    Ok(config)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Scenrun.toml` in the current working
/// directory, but this function exists so you can later:
///
/// - Respect an env var (e.g. `SCENRUN_CONFIG`).
/// - Look for multiple default locations.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Scenrun.toml")
}

/// Figure out the directory all relative config paths resolve against.
///
/// - If the config path has a non-empty parent (e.g. "configs/Scenrun.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Scenrun.toml" (parent = ""),
///   we fall back to the current working directory "."
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
