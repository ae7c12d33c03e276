use std::ffi::CString;
use std::fs::File;
use std::io::{self, Write};
use std::os::unix::io::{AsRawFd, RawFd};

use nix::errno::Errno;
use nix::sys::wait::waitpid;
use nix::unistd::{execvp, fork, ForkResult, Pid};
use tracing::debug;

use crate::error::ShellError;
use crate::redirects::Redirections;
use crate::signal_handler::{self, InterruptGuard};
use crate::status::Termination;

pub const EXEC_FAILED: &str = "smallsh: command could not be executed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Finished(Termination),
    Spawned(Pid),
}

/// Fork and exec `argv`.
///
/// Foreground launches block until the child ends. Background launches
/// return the child's pid straight away.
pub fn launch(
    argv: &[String],
    redirections: Redirections,
    background: bool,
) -> Result<LaunchOutcome, ShellError> {
    // Build the C strings before forking so the child never allocates.
    let args = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(program) = args.first() else {
        return Err(ShellError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty command",
        )));
    };

    match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            signal_handler::prepare_child(!background);
            bind_or_exit(redirections.stdin.as_ref(), libc::STDIN_FILENO);
            bind_or_exit(redirections.stdout.as_ref(), libc::STDOUT_FILENO);

            let _ = execvp(program, &args);
            println!("{}", EXEC_FAILED);
            let _ = io::stdout().flush();
            std::process::exit(1);
        }
        Ok(ForkResult::Parent { child }) => {
            // The child holds its own copies now.
            drop(redirections);
            debug!(pid = %child, program = %argv[0], background, "spawned child");

            if background {
                Ok(LaunchOutcome::Spawned(child))
            } else {
                wait_foreground(child).map(LaunchOutcome::Finished)
            }
        }
        Err(e) => Err(ShellError::Fork(e)),
    }
}

fn bind_or_exit(file: Option<&File>, target: RawFd) {
    if let Some(file) = file {
        if Errno::result(unsafe { libc::dup2(file.as_raw_fd(), target) }).is_err() {
            std::process::exit(1);
        }
    }
}

fn wait_foreground(child: Pid) -> Result<Termination, ShellError> {
    let _guard = InterruptGuard::ignore()?;

    loop {
        match waitpid(child, None) {
            Ok(status) => {
                if let Some(termination) = Termination::from_wait_status(status) {
                    debug!(pid = %child, %termination, "foreground child finished");
                    return Ok(termination);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(source) => {
                return Err(ShellError::Wait {
                    pid: child.as_raw(),
                    source,
                })
            }
        }
    }
}
