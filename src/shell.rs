use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;

use tracing::{debug, error};

use crate::command::{Command, ParsedLine};
use crate::config::Config;
use crate::error::ShellError;
use crate::jobs::JobTable;
use crate::launcher::{self, LaunchOutcome, EXEC_FAILED};
use crate::prompt::{self, Prompt};
use crate::signal_handler::{self, Mode};
use crate::status::{ShellStatus, Termination};

pub struct Shell {
    config: Config,
    prompt: Prompt,
    job_table: JobTable,
    status: ShellStatus,
    pid: u32,
    running: bool,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Self {
            prompt: Prompt::new(&config.prompt),
            config,
            job_table: JobTable::new(),
            status: ShellStatus::new(),
            pid: std::process::id(),
            running: true,
        }
    }

    /// Run the read/dispatch loop on standard input until `exit` or end of
    /// input. Returns the process exit code.
    pub fn run(&mut self) -> i32 {
        if let Err(e) = signal_handler::install_mode_handler()
            .and_then(|_| signal_handler::ignore_interrupts())
        {
            error!(error = %e, "signal setup failed");
            eprintln!("smallsh: {}", e);
            return 1;
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut buf = Vec::new();

        while self.running {
            self.report_finished_jobs();
            self.prompt.display();

            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    debug!("end of input");
                    self.exit();
                }
                Ok(_) => {
                    let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
                    let line = String::from_utf8_lossy(bytes);
                    if let Err(e) = self.execute(&line) {
                        if e.is_fatal() {
                            error!(error = %e, "unrecoverable error");
                            return 1;
                        }
                        prompt::diagnostic(&e.to_string());
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(error = %e, "failed to read input");
                    prompt::diagnostic(&format!("failed to read input: {}", e));
                    self.exit();
                }
            }
        }

        0
    }

    fn report_finished_jobs(&mut self) {
        for report in self.job_table.poll_all() {
            prompt::say(&report.to_string());
        }
    }

    pub fn execute(&mut self, input: &str) -> Result<(), ShellError> {
        match Command::parse(input, self.pid, self.config.max_args) {
            Command::Skip => Ok(()),
            Command::Cd(path) => {
                change_directory(path);
                Ok(())
            }
            Command::Status => {
                prompt::say(&self.status.report());
                Ok(())
            }
            Command::Exit => {
                self.exit();
                Ok(())
            }
            Command::External { line, background } => {
                let background =
                    background && signal_handler::current_mode() == Mode::BackgroundAllowed;
                self.run_external(line, background)
            }
        }
    }

    fn run_external(&mut self, line: ParsedLine, background: bool) -> Result<(), ShellError> {
        if line.truncated {
            prompt::diagnostic(&format!(
                "exceeded maximum number of arguments, using first {}",
                self.config.max_args
            ));
        }
        if !line.redirects.is_empty() {
            debug!(redirects = ?line.redirects, "redirections requested");
        }

        let redirections = line.redirects.open(background, &self.config.null_device);

        match launcher::launch(&line.argv, redirections, background) {
            Ok(LaunchOutcome::Finished(termination)) => {
                if let Termination::Signaled(_) = termination {
                    prompt::say(&termination.to_string());
                }
                self.status.record(termination);
            }
            Ok(LaunchOutcome::Spawned(pid)) => {
                prompt::say(&format!("background pid is {}", pid));
                self.job_table.register(pid);
            }
            Err(ShellError::InvalidArgument(e)) => {
                debug!(error = %e, "cannot pass argument to exec");
                prompt::say(EXEC_FAILED);
                self.status.record(Termination::Exited(1));
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    fn exit(&mut self) {
        if !self.job_table.is_empty() {
            debug!(jobs = self.job_table.len(), "terminating background jobs");
            self.job_table.terminate_all();
        }
        self.running = false;
    }
}

/// `cd` with no argument goes to `$HOME`. Failures are reported and the
/// current directory is left alone.
fn change_directory(path: Option<String>) {
    let target = match path {
        Some(path) => PathBuf::from(path),
        None => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home),
            None => {
                debug!("HOME is not set");
                return;
            }
        },
    };

    match env::set_current_dir(&target) {
        Ok(()) => debug!(dir = %target.display(), "changed directory"),
        Err(e) => {
            debug!(dir = %target.display(), error = %e, "cd failed");
            prompt::diagnostic(&format!("{}: No such file or directory", target.display()));
        }
    }
}
