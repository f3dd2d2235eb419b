// src/runner/process.rs

//! Process-tree termination.
//!
//! The external tools the runner spawns may fork their own workers, so a
//! stop request has to take down every descendant of the tracked pid, not
//! just the top-level process.

use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::debug;

/// Kill `root` and every process descended from it, deepest-first.
///
/// Returns the number of processes that were signalled. A pid that already
/// exited between enumeration and kill is skipped silently.
pub fn kill_process_tree(root: u32) -> usize {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let root_pid = Pid::from_u32(root);

    // Breadth-first collection of the descendant set.
    let mut doomed = vec![root_pid];
    let mut idx = 0;
    while idx < doomed.len() {
        let parent = doomed[idx];
        for (pid, process) in sys.processes() {
            if process.parent() == Some(parent) && !doomed.contains(pid) {
                doomed.push(*pid);
            }
        }
        idx += 1;
    }

    // Leaves first, so children don't get re-parented mid-walk.
    let mut killed = 0;
    for pid in doomed.iter().rev() {
        if let Some(process) = sys.process(*pid) {
            if process.kill() {
                killed += 1;
            }
        }
    }

    debug!(root, killed, "process tree terminated");
    killed
}
