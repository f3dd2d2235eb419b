// src/runner/runner.rs

//! The single-slot job orchestrator.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, warn};

use crate::config::SimulationSection;
use crate::errors::{Result, ScenrunError};
use crate::runner::job::{JobState, PENDING_SENTINEL};
use crate::runner::process;
use crate::store::paths::validate_component;

/// The currently tracked process.
///
/// `cancel` is taken by [`JobRunner::stop`] to request termination; the
/// supervising task owns the [`Child`] itself.
#[derive(Debug)]
struct ActiveJob {
    pid: u32,
    cancel: Option<oneshot::Sender<()>>,
}

/// Owns the one active job's handle and the status record.
///
/// All start/stop/status operations route through this object; the slot is
/// guarded by a single mutex and the lifecycle state is published on a
/// `watch` channel so `stop()` can await the transition it caused.
#[derive(Debug)]
pub struct JobRunner {
    workdir: PathBuf,
    sim_command: String,
    sim_args: Vec<String>,
    status_log: PathBuf,
    slot: Arc<Mutex<Option<ActiveJob>>>,
    state_tx: watch::Sender<JobState>,
    state_rx: watch::Receiver<JobState>,
}

impl JobRunner {
    /// Build a runner from the validated config, resolving the status record
    /// against `workdir`.
    pub fn new(workdir: &Path, simulation: &SimulationSection) -> Self {
        let (state_tx, state_rx) = watch::channel(JobState::Idle);
        Self {
            workdir: workdir.to_path_buf(),
            sim_command: simulation.command.clone(),
            sim_args: simulation.args.clone(),
            status_log: workdir.join(&simulation.status_log),
            slot: Arc::new(Mutex::new(None)),
            state_tx,
            state_rx,
        }
    }

    /// Start a simulation run for `scenario` and block until it exits.
    ///
    /// The status record is reset to the `pending` sentinel, the configured
    /// simulation command is spawned with `-s <scenario>` appended, and the
    /// combined output is drained into the status record as lines arrive.
    /// Returns the pid once the process has exited.
    ///
    /// Rejected with [`ScenrunError::JobAlreadyRunning`] while another job
    /// holds the slot.
    pub async fn start(&self, scenario: &str) -> Result<u32> {
        validate_component(scenario)?;

        let mut args = self.sim_args.clone();
        args.push("-s".to_string());
        args.push(scenario.to_string());

        self.run_to_log(&self.sim_command, &args, &self.status_log, true)
            .await
    }

    /// Run an arbitrary external command through the single job slot,
    /// appending its combined output to `log`.
    ///
    /// This is the primitive both simulation runs and report invocations are
    /// built on. The call blocks its caller for the full duration of the
    /// process; `status()` and `stop()` remain callable from other tasks.
    pub async fn run_to_log(
        &self,
        program: &str,
        args: &[String],
        log: &Path,
        reset_status: bool,
    ) -> Result<u32> {
        let done_rx = {
            let mut slot = self.slot.lock().expect("job slot poisoned");
            if slot.is_some() {
                return Err(ScenrunError::JobAlreadyRunning);
            }

            if reset_status {
                fs::write(&self.status_log, format!("{PENDING_SENTINEL}\n"))
                    .with_context(|| format!("resetting status record {:?}", self.status_log))?;
            }

            let mut cmd = Command::new(program);
            cmd.args(args)
                .current_dir(&self.workdir)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let child = cmd
                .spawn()
                .with_context(|| format!("spawning process '{program}'"))?;
            let pid = child.id().context("spawned process has no pid")?;

            let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
            let (done_tx, done_rx) = oneshot::channel::<u32>();

            *slot = Some(ActiveJob {
                pid,
                cancel: Some(cancel_tx),
            });
            let _ = self.state_tx.send(JobState::Running);

            info!(pid, program, ?args, "job started");

            tokio::spawn(drive(
                child,
                pid,
                log.to_path_buf(),
                self.status_log.clone(),
                cancel_rx,
                done_tx,
                Arc::clone(&self.slot),
                self.state_tx.clone(),
            ));

            done_rx
        };

        let pid = done_rx
            .await
            .map_err(|_| anyhow::anyhow!("job supervisor dropped before completion"))?;
        Ok(pid)
    }

    /// Last known status line.
    ///
    /// The most recently appended non-empty line of the status record, or an
    /// empty string when the record is missing or cleared. Never blocks,
    /// never fails.
    pub fn status(&self) -> String {
        match fs::read_to_string(&self.status_log) {
            Ok(contents) => contents
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("")
                .trim()
                .to_string(),
            Err(_) => String::new(),
        }
    }

    /// Truncate the status record and write the `pending` sentinel.
    pub fn reset_status(&self) -> Result<()> {
        fs::write(&self.status_log, format!("{PENDING_SENTINEL}\n"))
            .with_context(|| format!("resetting status record {:?}", self.status_log))?;
        Ok(())
    }

    /// Terminate the tracked process and its whole process tree, then clear
    /// the status record.
    ///
    /// Fails with [`ScenrunError::NoActiveJob`] when nothing is tracked.
    /// Awaits the `Killed` transition before returning, so a subsequent
    /// `status()` observes the cleared record.
    pub async fn stop(&self) -> Result<()> {
        let cancel = {
            let mut slot = self.slot.lock().expect("job slot poisoned");
            match slot.as_mut() {
                None => return Err(ScenrunError::NoActiveJob),
                Some(job) => job.cancel.take(),
            }
        };

        if let Some(tx) = cancel {
            // Send failure means the job finished in the meantime; the wait
            // below observes whichever terminal state it reached.
            let _ = tx.send(());
        }

        let mut rx = self.state_rx.clone();
        rx.wait_for(|state| !state.is_running())
            .await
            .map_err(|_| anyhow::anyhow!("job state channel closed"))?;

        info!("job stopped");
        Ok(())
    }

    /// Snapshot of the job lifecycle state.
    pub fn state(&self) -> JobState {
        *self.state_rx.borrow()
    }
}

/// Supervise one spawned process: drain its output into the log, wait for
/// exit or cancellation, then publish the terminal state.
#[allow(clippy::too_many_arguments)]
async fn drive(
    mut child: Child,
    pid: u32,
    log: PathBuf,
    status_log: PathBuf,
    mut cancel_rx: oneshot::Receiver<()>,
    done_tx: oneshot::Sender<u32>,
    slot: Arc<Mutex<Option<ActiveJob>>>,
    state_tx: watch::Sender<JobState>,
) {
    let (line_tx, line_rx) = mpsc::channel::<String>(64);

    if let Some(stdout) = child.stdout.take() {
        spawn_reader(stdout, line_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(stderr, line_tx.clone());
    }
    drop(line_tx);

    let appender = tokio::spawn(append_lines(log, line_rx));

    let outcome = tokio::select! {
        status = child.wait() => {
            match status {
                Ok(status) => {
                    info!(pid, code = status.code().unwrap_or(-1), "job process exited");
                }
                Err(err) => {
                    warn!(pid, error = %err, "failed waiting for job process");
                }
            }
            JobState::Completed
        }

        cancel = &mut cancel_rx => match cancel {
            Ok(()) => {
                info!(pid, "stop requested; killing process tree");
                process::kill_process_tree(pid);
                let _ = child.start_kill();
                let _ = child.wait().await;
                JobState::Killed
            }
            Err(_) => {
                // Runner dropped without an explicit stop; wait the child out.
                let _ = child.wait().await;
                JobState::Completed
            }
        },
    };

    // Let the drain finish so the log holds every emitted line before the
    // terminal state is published.
    let _ = appender.await;

    if outcome == JobState::Killed {
        if let Err(err) = fs::write(&status_log, b"") {
            warn!(error = %err, "failed to clear status record after kill");
        }
    }

    slot.lock().expect("job slot poisoned").take();
    let _ = state_tx.send(outcome);
    let _ = done_tx.send(pid);
}

/// Forward one stdio stream to the line channel until EOF.
fn spawn_reader<R>(stream: R, tx: mpsc::Sender<String>)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
}

/// Append lines to the log as they arrive, flushing each one so pollers see
/// progress while the process runs.
async fn append_lines(path: PathBuf, mut rx: mpsc::Receiver<String>) {
    let file = tokio::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .await;

    let mut file = match file {
        Ok(f) => f,
        Err(err) => {
            warn!(path = ?path, error = %err, "failed to open log for append");
            // Keep draining so the readers never stall on a full channel.
            while rx.recv().await.is_some() {}
            return;
        }
    };

    while let Some(line) = rx.recv().await {
        let record = format!("{line}\n");
        if let Err(err) = file.write_all(record.as_bytes()).await {
            warn!(path = ?path, error = %err, "failed to append log line");
            break;
        }
        let _ = file.flush().await;
    }
}
