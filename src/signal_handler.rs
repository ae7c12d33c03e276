use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::debug;

use crate::error::ShellError;

const ENTER_FOREGROUND_ONLY: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n: ";
const EXIT_FOREGROUND_ONLY: &[u8] = b"\nExiting foreground-only mode\n: ";

static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    BackgroundAllowed,
    ForegroundOnly,
}

pub fn current_mode() -> Mode {
    if FOREGROUND_ONLY.load(Ordering::SeqCst) {
        Mode::ForegroundOnly
    } else {
        Mode::BackgroundAllowed
    }
}

/// Flip the mode and return the notice for the new state.
fn toggle_mode() -> &'static [u8] {
    let was_foreground_only = FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst);
    if was_foreground_only {
        EXIT_FOREGROUND_ONLY
    } else {
        ENTER_FOREGROUND_ONLY
    }
}

// Runs asynchronously: no allocation, no locks, no formatting.
extern "C" fn handle_sigtstp(_: libc::c_int) {
    let notice = toggle_mode();
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            notice.as_ptr().cast::<libc::c_void>(),
            notice.len(),
        );
    }
}

/// Install the SIGTSTP handler that toggles foreground-only mode.
pub fn install_mode_handler() -> Result<(), ShellError> {
    let action = SigAction::new(
        SigHandler::Handler(handle_sigtstp),
        SaFlags::SA_RESTART,
        SigSet::all(),
    );
    unsafe { signal::sigaction(Signal::SIGTSTP, &action) }.map_err(|source| {
        ShellError::Signal {
            signal: "SIGTSTP",
            source,
        }
    })?;
    debug!("foreground-only mode handler installed");
    Ok(())
}

/// Make the shell itself immune to Ctrl-C.
pub fn ignore_interrupts() -> Result<(), ShellError> {
    set_handler(Signal::SIGINT, SigHandler::SigIgn).map(|_| ())
}

fn set_handler(sig: Signal, handler: SigHandler) -> Result<SigAction, ShellError> {
    let action = SigAction::new(handler, SaFlags::SA_RESTART, SigSet::all());
    unsafe { signal::sigaction(sig, &action) }.map_err(|source| ShellError::Signal {
        signal: sig.as_str(),
        source,
    })
}

/// Ignores SIGINT while alive and puts the previous disposition back on drop.
pub struct InterruptGuard {
    previous: SigAction,
}

impl InterruptGuard {
    pub fn ignore() -> Result<Self, ShellError> {
        let previous = set_handler(Signal::SIGINT, SigHandler::SigIgn)?;
        Ok(Self { previous })
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        let _ = unsafe { signal::sigaction(Signal::SIGINT, &self.previous) };
    }
}

/// Signal setup for a freshly forked child, before exec.
///
/// Foreground children get default Ctrl-C behaviour back. Every child
/// ignores SIGTSTP so the suspend key only ever reaches the shell's handler,
/// and gets the default SIGPIPE the Rust runtime turned off in the shell.
pub fn prepare_child(foreground: bool) {
    unsafe {
        if foreground {
            let _ = signal::signal(Signal::SIGINT, SigHandler::SigDfl);
        }
        let _ = signal::signal(Signal::SIGTSTP, SigHandler::SigIgn);
        let _ = signal::signal(Signal::SIGPIPE, SigHandler::SigDfl);
    }
}
