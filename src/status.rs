use std::fmt;

use nix::sys::wait::WaitStatus;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Exited(i32),
    Signaled(i32),
}

impl Termination {
    /// Translate a wait result. Stops, continues and "still alive" are not
    /// terminations.
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(Termination::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => Some(Termination::Signaled(signal as i32)),
            _ => None,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit value {}", code),
            Termination::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

/// Outcome of the last foreground command, shown by the `status` built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellStatus {
    last: Termination,
}

impl Default for ShellStatus {
    fn default() -> Self {
        Self {
            last: Termination::Exited(0),
        }
    }
}

impl ShellStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, termination: Termination) {
        self.last = termination;
    }

    /// Return the message for `status` and reset to `exit value 0`.
    pub fn report(&mut self) -> String {
        let message = self.last.to_string();
        self.last = Termination::Exited(0);
        message
    }
}
