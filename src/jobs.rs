use std::fmt;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::status::Termination;

/// A finished background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    pub pid: Pid,
    pub termination: Termination,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background pid {} is done: ", self.pid)?;
        match self.termination {
            Termination::Exited(code) => write!(f, "exit status {}", code),
            Termination::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

/// Background processes the shell has not reaped yet.
#[derive(Debug, Default)]
pub struct JobTable {
    pids: Vec<Pid>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `pid`. Returns false if it was already tracked.
    pub fn register(&mut self, pid: Pid) -> bool {
        if self.pids.contains(&pid) {
            return false;
        }
        self.pids.push(pid);
        true
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// Check every tracked pid without blocking and collect the ones that
    /// have finished. Reaped pids are dropped so they are never waited on
    /// again.
    pub fn poll_all(&mut self) -> Vec<JobReport> {
        let mut reports = Vec::new();

        self.pids.retain(|&pid| {
            match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) => true,
                Ok(status) => match Termination::from_wait_status(status) {
                    Some(termination) => {
                        debug!(%pid, %termination, "reaped background job");
                        reports.push(JobReport { pid, termination });
                        false
                    }
                    None => true,
                },
                Err(Errno::EINTR) => true,
                Err(Errno::ECHILD) => {
                    debug!(%pid, "background job is no longer our child");
                    false
                }
                Err(e) => {
                    warn!(%pid, error = %e, "failed to poll background job");
                    true
                }
            }
        });

        reports
    }

    /// Send SIGTERM to every tracked job. Does not wait for them.
    pub fn terminate_all(&self) {
        for &pid in &self.pids {
            if let Err(e) = signal::kill(pid, Signal::SIGTERM) {
                debug!(%pid, error = %e, "failed to terminate background job");
            }
        }
    }
}
