// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// root = "projects/project"
/// template = "projects/demo/base"
///
/// [simulation]
/// command = "Rscript"
/// args = ["scripts/model.r"]
///
/// [report]
/// command = "Rscript"
/// args = ["scripts/model_reports.r"]
/// ```
///
/// All sections are optional and have reasonable defaults, so an empty file
/// (or no file edits at all) yields a usable configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    /// Project layout from `[project]`.
    #[serde(default)]
    pub project: ProjectSection,

    /// Simulation executable settings from `[simulation]`.
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Report executable settings from `[report]`.
    #[serde(default)]
    pub report: ReportSection,
}

/// `[project]` section: where scenario directories and related files live.
///
/// All paths are interpreted relative to the directory containing the config
/// file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Directory holding one subdirectory per scenario.
    #[serde(default = "default_project_root")]
    pub root: PathBuf,

    /// Tree that is deep-copied when a scenario is created from the template.
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Optional parallel cache directory kept by a UI layer; removed
    /// best-effort when a scenario is deleted.
    #[serde(default)]
    pub ui_cache: Option<PathBuf>,

    /// One-file location for the default-state selection.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

fn default_project_root() -> PathBuf {
    PathBuf::from("projects/project")
}

fn default_template() -> PathBuf {
    PathBuf::from("projects/demo/base")
}

fn default_state_file() -> PathBuf {
    PathBuf::from("state.txt")
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            root: default_project_root(),
            template: default_template(),
            ui_cache: None,
            state_file: default_state_file(),
        }
    }
}

/// `[simulation]` section: the external simulation executable.
///
/// The scenario selector (`-s <name>`) is appended by the runner; `args`
/// carries only the fixed leading arguments (typically the script path).
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSection {
    /// Program to spawn.
    #[serde(default = "default_sim_command")]
    pub command: String,

    /// Fixed leading arguments.
    #[serde(default = "default_sim_args")]
    pub args: Vec<String>,

    /// Status record / run log artifact, truncated on each start.
    #[serde(default = "default_status_log")]
    pub status_log: PathBuf,
}

fn default_sim_command() -> String {
    "Rscript".to_string()
}

fn default_sim_args() -> Vec<String> {
    vec!["scripts/model.r".to_string()]
}

fn default_status_log() -> PathBuf {
    PathBuf::from("run.log")
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            command: default_sim_command(),
            args: default_sim_args(),
            status_log: default_status_log(),
        }
    }
}

/// `[report]` section: the external report-generation executable.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSection {
    /// Program to spawn.
    #[serde(default = "default_report_command")]
    pub command: String,

    /// Fixed leading arguments.
    #[serde(default = "default_report_args")]
    pub args: Vec<String>,

    /// Append-only report log; never truncated.
    #[serde(default = "default_report_log")]
    pub log: PathBuf,

    /// CSV table describing the metrics/measures offered to callers.
    #[serde(default = "default_report_settings")]
    pub settings: PathBuf,
}

fn default_report_command() -> String {
    "Rscript".to_string()
}

fn default_report_args() -> Vec<String> {
    vec!["scripts/model_reports.r".to_string()]
}

fn default_report_log() -> PathBuf {
    PathBuf::from("reports.log")
}

fn default_report_settings() -> PathBuf {
    PathBuf::from("scripts/outputs.csv")
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            command: default_report_command(),
            args: default_report_args(),
            log: default_report_log(),
            settings: default_report_settings(),
        }
    }
}

/// Validated configuration.
///
/// Constructed from [`RawConfig`] via `TryFrom` (see `validate.rs`); the
/// fields are the same but every invariant in [`validate`](super::validate)
/// is known to hold.
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectSection,
    pub simulation: SimulationSection,
    pub report: ReportSection,
}

impl Config {
    /// Construct without validation. Only `validate.rs` should call this.
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        simulation: SimulationSection,
        report: ReportSection,
    ) -> Self {
        Self {
            project,
            simulation,
            report,
        }
    }
}
