use std::ffi::NulError;
use std::io;

use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("fork failed: {0}")]
    Fork(#[source] Errno),

    #[error("waiting for child {pid} failed: {source}")]
    Wait { pid: i32, source: Errno },

    #[error("failed to install handler for {signal}: {source}")]
    Signal { signal: &'static str, source: Errno },

    #[error("argument contains a NUL byte")]
    InvalidArgument(#[from] NulError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Errors after which the shell cannot keep running.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Fork(_))
    }
}
