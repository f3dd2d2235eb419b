// src/config/mod.rs

//! Configuration layer.
//!
//! - [`model`] defines the TOML data model (`RawConfig` and the validated
//!   [`Config`]).
//! - [`loader`] reads and deserializes the config file.
//! - [`validate`] turns a `RawConfig` into a checked `Config`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{Config, ProjectSection, RawConfig, ReportSection, SimulationSection};
