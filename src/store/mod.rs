// src/store/mod.rs

//! Scenario Store: directory-backed CRUD over scenario entities.
//!
//! A scenario is a directory under the project root holding `inputs`,
//! `parameters` and `outputs` subtrees plus a creation timestamp. The store
//! owns those trees exclusively; the runner only ever receives scenario
//! names, never paths.
//!
//! - [`paths`] — name validation and layout constants.
//! - [`tree`] — recursive copy/delete helpers.
//! - [`files`] — whole-file line/CSV marshalling.

pub mod files;
pub mod paths;
pub mod tree;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::config::{ProjectSection, ReportSection};
use crate::errors::{Result, ScenrunError};

pub use paths::{FileKind, RESERVED_ENTRIES, TEMPLATE_SOURCE};

use paths::{INCOMPLETE_MARKER, TIMESTAMP_FILE};

/// Sources a new scenario can be cloned from: the fixed template plus every
/// existing scenario.
#[derive(Debug, Clone)]
pub struct CloneSources {
    pub root_scenarios: Vec<String>,
    pub scenarios: Vec<String>,
}

/// Directory-backed scenario CRUD.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    root: PathBuf,
    template: PathBuf,
    ui_cache: Option<PathBuf>,
    state_file: PathBuf,
    report_settings: PathBuf,
}

impl ScenarioStore {
    /// Build a store from the validated config, resolving relative paths
    /// against `workdir`.
    pub fn new(workdir: &Path, project: &ProjectSection, report: &ReportSection) -> Self {
        Self {
            root: workdir.join(&project.root),
            template: workdir.join(&project.template),
            ui_cache: project.ui_cache.as_ref().map(|p| workdir.join(p)),
            state_file: workdir.join(&project.state_file),
            report_settings: workdir.join(&report.settings),
        }
    }

    /// The project root this store manages.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List scenario names under the project root.
    ///
    /// The reserved `parameters` and `reports` entries are excluded. A
    /// missing root is created and yields an empty listing rather than an
    /// error.
    pub fn list_scenarios(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)
                .with_context(|| format!("creating project root {:?}", self.root))?;
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in
            fs::read_dir(&self.root).with_context(|| format!("reading dir {:?}", self.root))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if RESERVED_ENTRIES.contains(&name.as_str()) {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// The sources offered for cloning: the template pseudo-source first,
    /// then every existing scenario.
    pub fn clone_sources(&self) -> Result<CloneSources> {
        Ok(CloneSources {
            root_scenarios: vec![TEMPLATE_SOURCE.to_string()],
            scenarios: self.list_scenarios()?,
        })
    }

    /// Create `name` by deep-copying either the template tree or the
    /// `source` scenario's tree.
    ///
    /// Returns `Ok(false)` with no side effects when `name` already exists.
    /// A `.incomplete` marker is present inside the new directory until the
    /// copy and the creation timestamp have both been written, so an
    /// interrupted create is detectable.
    pub fn create_scenario(&self, name: &str, source: &str, from_template: bool) -> Result<bool> {
        paths::validate_scenario_name(name)?;

        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating project root {:?}", self.root))?;

        let dest = self.root.join(name);
        if dest.exists() {
            debug!(scenario = %name, "create rejected: name already exists");
            return Ok(false);
        }

        let src = if from_template {
            self.template.clone()
        } else {
            paths::validate_scenario_name(source)?;
            let src = self.root.join(source);
            if !src.is_dir() {
                return Err(ScenrunError::ScenarioNotFound(source.to_string()));
            }
            src
        };

        fs::create_dir_all(&dest).with_context(|| format!("creating dir {:?}", dest))?;
        let marker = dest.join(INCOMPLETE_MARKER);
        fs::write(&marker, b"").with_context(|| format!("writing marker {:?}", marker))?;

        tree::copy_tree(&src, &dest)?;

        let stamp = chrono::Local::now().format("%a %b %d %H:%M:%S %Y").to_string();
        fs::write(dest.join(TIMESTAMP_FILE), stamp)
            .with_context(|| format!("writing timestamp in {:?}", dest))?;

        fs::remove_file(&marker).with_context(|| format!("removing marker {:?}", marker))?;

        info!(scenario = %name, from_template, source = %source, "scenario created");
        Ok(true)
    }

    /// Remove a scenario's directory tree.
    ///
    /// The parallel UI-cache directory for the same name is removed
    /// best-effort; its failure is swallowed.
    pub fn delete_scenario(&self, name: &str) -> Result<()> {
        paths::validate_scenario_name(name)?;

        let dir = self.root.join(name);
        fs::remove_dir_all(&dir).with_context(|| format!("removing scenario {:?}", dir))?;

        if let Some(cache) = &self.ui_cache {
            tree::remove_tree_best_effort(&cache.join(name));
        }

        info!(scenario = %name, "scenario deleted");
        Ok(())
    }

    /// List file names in one of a scenario's subdirectories.
    ///
    /// The `outputs` subdirectory is created lazily; `inputs` and
    /// `parameters` must already exist.
    pub fn list_files(&self, name: &str, kind: FileKind) -> Result<Vec<String>> {
        let dir = self.subdir(name, kind)?;

        if kind == FileKind::Outputs && !dir.exists() {
            fs::create_dir_all(&dir).with_context(|| format!("creating dir {:?}", dir))?;
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("reading dir {:?}", dir))? {
            let entry = entry?;
            files.push(entry.file_name().to_string_lossy().to_string());
        }
        files.sort();
        Ok(files)
    }

    /// The outputs listing plus the directory's absolute path, for callers
    /// that want to open the folder.
    pub fn outputs_directory(&self, name: &str) -> Result<(Vec<String>, PathBuf)> {
        let files = self.list_files(name, FileKind::Outputs)?;
        Ok((files, self.subdir(name, FileKind::Outputs)?))
    }

    /// Read a scenario file as trimmed text lines.
    pub fn read_lines(&self, name: &str, kind: FileKind, file: &str) -> Result<Vec<String>> {
        files::read_lines(&self.file_path(name, kind, file)?)
    }

    /// Replace a scenario file with the given text lines.
    pub fn write_lines(
        &self,
        name: &str,
        kind: FileKind,
        file: &str,
        lines: &[String],
    ) -> Result<()> {
        files::write_lines(&self.file_path(name, kind, file)?, lines)
    }

    /// Read a scenario file as a comma-separated table.
    pub fn read_rows(&self, name: &str, kind: FileKind, file: &str) -> Result<Vec<Vec<String>>> {
        files::read_rows(&self.file_path(name, kind, file)?)
    }

    /// Replace a scenario file with the given comma-separated table.
    pub fn write_rows(
        &self,
        name: &str,
        kind: FileKind,
        file: &str,
        rows: &[Vec<String>],
    ) -> Result<()> {
        files::write_rows(&self.file_path(name, kind, file)?, rows)
    }

    /// The report-settings table: which metrics and measures reports can be
    /// generated for.
    pub fn read_report_settings(&self) -> Result<Vec<Vec<String>>> {
        files::read_rows(&self.report_settings)
    }

    /// Read the default-state file; `None` when it has never been written.
    pub fn read_default_state(&self) -> Result<Option<Vec<String>>> {
        if !self.state_file.exists() {
            return Ok(None);
        }
        files::read_lines(&self.state_file).map(Some)
    }

    /// Replace the default-state file.
    pub fn write_default_state(&self, lines: &[String]) -> Result<()> {
        files::write_lines(&self.state_file, lines)
    }

    fn scenario_dir(&self, name: &str) -> Result<PathBuf> {
        paths::validate_scenario_name(name)?;
        Ok(self.root.join(name))
    }

    fn subdir(&self, name: &str, kind: FileKind) -> Result<PathBuf> {
        Ok(self.scenario_dir(name)?.join(kind.dir_name()))
    }

    fn file_path(&self, name: &str, kind: FileKind, file: &str) -> Result<PathBuf> {
        paths::validate_component(file)?;
        Ok(self.subdir(name, kind)?.join(file))
    }
}
