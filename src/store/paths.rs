// src/store/paths.rs

//! Name validation and path layout for scenario directories.
//!
//! Every operation on the store is scoped by a scenario name and (for file
//! operations) a file name. Both must be single path components so that no
//! request can reach outside the project root.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ScenrunError};

/// Entries under the project root that are not scenarios.
pub const RESERVED_ENTRIES: [&str; 2] = ["parameters", "reports"];

/// File written into a scenario directory at creation time.
pub const TIMESTAMP_FILE: &str = "time.txt";

/// Marker present while a scenario directory is being populated. A surviving
/// marker means the copy was interrupted.
pub const INCOMPLETE_MARKER: &str = ".incomplete";

/// Pseudo-source name callers use to clone from the template tree.
pub const TEMPLATE_SOURCE: &str = "template";

/// The three per-scenario subdirectories exposed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Inputs,
    Parameters,
    Outputs,
}

impl FileKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            FileKind::Inputs => "inputs",
            FileKind::Parameters => "parameters",
            FileKind::Outputs => "outputs",
        }
    }
}

/// Check that `name` is usable as a single path component.
///
/// Rejects empty names, `.` / `..`, and anything containing a path
/// separator. This is the traversal-safety gate for the whole store.
pub fn validate_component(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScenrunError::InvalidName("empty name".to_string()));
    }
    if name == "." || name == ".." {
        return Err(ScenrunError::InvalidName(name.to_string()));
    }
    if name.chars().any(std::path::is_separator) || name.contains('\\') {
        return Err(ScenrunError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Check that `name` names a scenario: a valid component that is not one of
/// the reserved project-root entries.
pub fn validate_scenario_name(name: &str) -> Result<()> {
    validate_component(name)?;
    if RESERVED_ENTRIES.contains(&name) {
        return Err(ScenrunError::InvalidName(format!("'{name}' is reserved")));
    }
    Ok(())
}
