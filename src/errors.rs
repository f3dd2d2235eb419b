// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("a job is already running")]
    JobAlreadyRunning,

    #[error("no job is currently running")]
    NoActiveJob,

    #[error("Malformed metric identifier: {0}")]
    MalformedMetric(String),

    #[error("report request carried an empty scenario set")]
    EmptyScenarioSet,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ScenrunError>;
