#![allow(dead_code)]

//! Disposable on-disk project trees for tests.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use scenrun::config::{Config, ProjectSection, RawConfig, ReportSection, SimulationSection};
use scenrun::runner::JobRunner;
use scenrun::store::ScenarioStore;
use scenrun::Orchestrator;

/// Builder for a temporary project directory plus a matching config.
///
/// The layout mirrors a real working directory:
///
/// ```text
/// <tempdir>/
///   template/            cloned for template-based creation
///   project/             scenario directories (created on demand)
///   ui_cache/            parallel cache, removed best-effort on delete
///   outputs.csv          report-settings table (optional)
/// ```
pub struct ProjectBuilder {
    template_files: Vec<(String, String)>,
    report_settings: Option<String>,
    sim_command: (String, Vec<String>),
    report_command: (String, Vec<String>),
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            template_files: vec![
                ("inputs/population.csv".to_string(), "zone,people\n1,100\n".to_string()),
                ("parameters/globals.csv".to_string(), "key,value\nyears,20\n".to_string()),
            ],
            report_settings: None,
            sim_command: ("sh".to_string(), vec!["-c".to_string(), "echo ok".to_string()]),
            report_command: ("sh".to_string(), vec!["-c".to_string(), "echo report".to_string()]),
        }
    }

    /// Replace the default template contents entirely.
    pub fn with_empty_template(mut self) -> Self {
        self.template_files.clear();
        self
    }

    /// Add a file (relative path, contents) to the template tree.
    pub fn with_template_file(mut self, rel: &str, contents: &str) -> Self {
        self.template_files.push((rel.to_string(), contents.to_string()));
        self
    }

    /// Provide a report-settings table.
    pub fn with_report_settings(mut self, contents: &str) -> Self {
        self.report_settings = Some(contents.to_string());
        self
    }

    /// Shell script run as the simulation command (via `sh -c`).
    pub fn with_sim_script(mut self, script: &str) -> Self {
        self.sim_command = ("sh".to_string(), vec!["-c".to_string(), script.to_string()]);
        self
    }

    /// Shell script run as the report command (via `sh -c`).
    pub fn with_report_script(mut self, script: &str) -> Self {
        self.report_command = ("sh".to_string(), vec!["-c".to_string(), script.to_string()]);
        self
    }

    pub fn build(self) -> TestProject {
        let temp = TempDir::new().expect("failed to create temp project dir");
        let workdir = temp.path().to_path_buf();

        for (rel, contents) in &self.template_files {
            let path = workdir.join("template").join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("failed to create template subdir");
            }
            fs::write(&path, contents).expect("failed to write template file");
        }
        // The template tree must exist even when empty.
        fs::create_dir_all(workdir.join("template")).expect("failed to create template dir");

        if let Some(contents) = &self.report_settings {
            fs::write(workdir.join("outputs.csv"), contents)
                .expect("failed to write report settings");
        }

        let raw = RawConfig {
            project: ProjectSection {
                root: PathBuf::from("project"),
                template: PathBuf::from("template"),
                ui_cache: Some(PathBuf::from("ui_cache")),
                state_file: PathBuf::from("state.txt"),
            },
            simulation: SimulationSection {
                command: self.sim_command.0,
                args: self.sim_command.1,
                status_log: PathBuf::from("run.log"),
            },
            report: ReportSection {
                command: self.report_command.0,
                args: self.report_command.1,
                log: PathBuf::from("reports.log"),
                settings: PathBuf::from("outputs.csv"),
            },
        };
        let config = Config::try_from(raw).expect("builder produced invalid config");

        TestProject {
            temp,
            workdir,
            config,
        }
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built temporary project. Dropping it removes the tree.
pub struct TestProject {
    temp: TempDir,
    pub workdir: PathBuf,
    pub config: Config,
}

impl TestProject {
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(&self.workdir, &self.config)
    }

    pub fn store(&self) -> ScenarioStore {
        ScenarioStore::new(&self.workdir, &self.config.project, &self.config.report)
    }

    pub fn runner(&self) -> Arc<JobRunner> {
        Arc::new(JobRunner::new(&self.workdir, &self.config.simulation))
    }

    /// Path under the project root (scenario directories).
    pub fn project_path(&self, rel: &str) -> PathBuf {
        self.workdir.join("project").join(rel)
    }

    /// Path under the temporary working directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.workdir.join(rel)
    }

    pub fn read_file(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("failed to read project file")
    }
}
