// src/runner/job.rs

//! Job lifecycle states.

/// State of the single job slot.
///
/// `Idle` only before the first run; after that the slot always reports how
/// the most recent job ended until a new one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// No job has run yet.
    Idle,
    /// A process is spawned and being drained.
    Running,
    /// The process exited on its own.
    Completed,
    /// The process was terminated by an explicit stop request.
    Killed,
}

impl JobState {
    pub fn is_running(self) -> bool {
        matches!(self, JobState::Running)
    }
}

/// Baseline written to the status record before a run, so pollers observe a
/// known value until the first log line arrives.
pub const PENDING_SENTINEL: &str = "pending";
