// src/config/validate.rs

use crate::config::model::{Config, RawConfig};
use crate::errors::{Result, ScenrunError};

impl TryFrom<RawConfig> for Config {
    type Error = crate::errors::ScenrunError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(Config::new_unchecked(raw.project, raw.simulation, raw.report))
    }
}

fn validate_raw_config(cfg: &RawConfig) -> Result<()> {
    validate_project(cfg)?;
    validate_command("simulation", &cfg.simulation.command)?;
    validate_command("report", &cfg.report.command)?;
    validate_log_paths(cfg)?;
    Ok(())
}

fn validate_project(cfg: &RawConfig) -> Result<()> {
    if cfg.project.root.as_os_str().is_empty() {
        return Err(ScenrunError::ConfigError(
            "[project].root must not be empty".to_string(),
        ));
    }
    if cfg.project.template.as_os_str().is_empty() {
        return Err(ScenrunError::ConfigError(
            "[project].template must not be empty".to_string(),
        ));
    }
    if cfg.project.state_file.as_os_str().is_empty() {
        return Err(ScenrunError::ConfigError(
            "[project].state_file must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_command(section: &str, command: &str) -> Result<()> {
    if command.trim().is_empty() {
        return Err(ScenrunError::ConfigError(format!(
            "[{section}].command must not be empty"
        )));
    }
    Ok(())
}

fn validate_log_paths(cfg: &RawConfig) -> Result<()> {
    if cfg.simulation.status_log.as_os_str().is_empty() {
        return Err(ScenrunError::ConfigError(
            "[simulation].status_log must not be empty".to_string(),
        ));
    }
    if cfg.report.log.as_os_str().is_empty() {
        return Err(ScenrunError::ConfigError(
            "[report].log must not be empty".to_string(),
        ));
    }
    Ok(())
}
