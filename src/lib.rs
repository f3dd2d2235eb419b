// src/lib.rs

pub mod boundary;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod report;
pub mod runner;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::config_root_dir;
use crate::config::{load_and_validate, Config};
use crate::report::ReportDriver;
use crate::runner::JobRunner;
use crate::store::ScenarioStore;

/// The orchestration core: the scenario store, the single-slot job runner,
/// and the report driver built on top of it.
///
/// The request boundary is the only caller; everything routes through this
/// object.
#[derive(Debug)]
pub struct Orchestrator {
    pub store: ScenarioStore,
    pub runner: Arc<JobRunner>,
    pub reports: ReportDriver,
}

impl Orchestrator {
    /// Wire the core components from a validated config, resolving all
    /// relative paths against `workdir`.
    pub fn new(workdir: &Path, config: &Config) -> Self {
        let store = ScenarioStore::new(workdir, &config.project, &config.report);
        let runner = Arc::new(JobRunner::new(workdir, &config.simulation));
        let reports = ReportDriver::new(workdir, &config.report, Arc::clone(&runner));
        Self {
            store,
            runner,
            reports,
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the orchestrator (store / runner / report driver)
/// - the stdio request boundary
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let workdir = config_root_dir(&config_path);
    let orchestrator = Arc::new(Orchestrator::new(&workdir, &cfg));

    info!(workdir = ?workdir, "scenrun started");

    boundary::serve_stdio(orchestrator).await?;
    Ok(())
}

/// Simple dry-run output: print the resolved settings without serving.
fn print_dry_run(cfg: &Config) {
    println!("scenrun dry-run");
    println!("  project.root = {:?}", cfg.project.root);
    println!("  project.template = {:?}", cfg.project.template);
    if let Some(cache) = &cfg.project.ui_cache {
        println!("  project.ui_cache = {:?}", cache);
    }
    println!("  project.state_file = {:?}", cfg.project.state_file);
    println!();
    println!(
        "  simulation: {} {:?} (status log {:?})",
        cfg.simulation.command, cfg.simulation.args, cfg.simulation.status_log
    );
    println!(
        "  report:     {} {:?} (log {:?}, settings {:?})",
        cfg.report.command, cfg.report.args, cfg.report.log, cfg.report.settings
    );
}
