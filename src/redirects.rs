use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use tracing::debug;

use crate::prompt;
use crate::tokenizer::split_tokens;

const OUTPUT_MODE: u32 = 0o777;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RedirectType {
    StdinFrom,
    StdoutTo,
}

impl RedirectType {
    fn marker(self) -> &'static str {
        match self {
            RedirectType::StdinFrom => "<",
            RedirectType::StdoutTo => ">",
        }
    }

    fn open(self, path: &Path) -> io::Result<File> {
        match self {
            RedirectType::StdinFrom => File::open(path),
            RedirectType::StdoutTo => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(OUTPUT_MODE)
                .open(path),
        }
    }

    fn open_null(self, null_device: &Path) -> io::Result<File> {
        match self {
            RedirectType::StdinFrom => File::open(null_device),
            RedirectType::StdoutTo => OpenOptions::new().write(true).open(null_device),
        }
    }
}

/// File names requested by `<` and `>` in a command line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RedirectSpec {
    pub input: Option<String>,
    pub output: Option<String>,
}

/// Descriptors the child binds onto its standard streams before exec.
/// `None` means the stream is inherited from the shell.
///
/// Files are opened with close-on-exec, so only the copies placed on fd 0
/// and fd 1 survive into the new program.
#[derive(Debug, Default)]
pub struct Redirections {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
}

impl RedirectSpec {
    pub fn scan(line: &str) -> Self {
        RedirectSpec {
            input: target_after(line, RedirectType::StdinFrom),
            output: target_after(line, RedirectType::StdoutTo),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }

    /// Open the requested files.
    ///
    /// A file that cannot be opened is reported to the user. Background
    /// commands then get the null device in that direction, foreground
    /// commands keep the shell's stream. Background commands without an
    /// explicit redirection always get the null device.
    pub fn open(&self, background: bool, null_device: &Path) -> Redirections {
        Redirections {
            stdin: open_stream(
                self.input.as_deref(),
                RedirectType::StdinFrom,
                background,
                null_device,
            ),
            stdout: open_stream(
                self.output.as_deref(),
                RedirectType::StdoutTo,
                background,
                null_device,
            ),
        }
    }
}

fn target_after(line: &str, kind: RedirectType) -> Option<String> {
    let mut tokens = split_tokens(line);
    while let Some(token) = tokens.next() {
        if token == kind.marker() {
            return tokens.next().map(|name| name.to_string());
        }
    }
    None
}

fn open_stream(
    target: Option<&str>,
    kind: RedirectType,
    background: bool,
    null_device: &Path,
) -> Option<File> {
    if let Some(name) = target {
        match kind.open(Path::new(name)) {
            Ok(file) => return Some(file),
            Err(e) => {
                debug!(file = name, error = %e, "redirection open failed");
                prompt::diagnostic(&format!("failed to open file: {}", name));
            }
        }
    }

    if !background {
        return None;
    }

    match kind.open_null(null_device) {
        Ok(file) => Some(file),
        Err(e) => {
            debug!(device = %null_device.display(), error = %e, "null device unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NULL_DEVICE;
    use std::fs;
    use std::io::Read;

    #[test]
    fn test_scan_both_directions() {
        let spec = RedirectSpec::scan("sort < in.txt > out.txt");
        assert_eq!(spec.input.as_deref(), Some("in.txt"));
        assert_eq!(spec.output.as_deref(), Some("out.txt"));
    }

    #[test]
    fn test_scan_none() {
        let spec = RedirectSpec::scan("echo a<b c>d");
        assert!(spec.is_empty());
    }

    #[test]
    fn test_scan_uses_first_marker() {
        let spec = RedirectSpec::scan("cmd > first > second");
        assert_eq!(spec.output.as_deref(), Some("first"));
    }

    #[test]
    fn test_scan_dangling_marker() {
        let spec = RedirectSpec::scan("cat >");
        assert!(spec.output.is_none());
    }

    #[test]
    fn test_open_output_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old contents").unwrap();

        let spec = RedirectSpec {
            input: None,
            output: Some(path.to_string_lossy().to_string()),
        };
        let redirections = spec.open(false, Path::new(NULL_DEVICE));
        assert!(redirections.stdout.is_some());
        assert!(redirections.stdin.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_foreground_failure_keeps_stream() {
        let spec = RedirectSpec {
            input: Some("/nonexistent/smallsh/input".to_string()),
            output: None,
        };
        let redirections = spec.open(false, Path::new(NULL_DEVICE));
        assert!(redirections.stdin.is_none());
        assert!(redirections.stdout.is_none());
    }

    #[test]
    fn test_background_failure_falls_back_to_null() {
        let spec = RedirectSpec {
            input: Some("/nonexistent/smallsh/input".to_string()),
            output: None,
        };
        let redirections = spec.open(true, Path::new(NULL_DEVICE));

        let mut stdin = redirections.stdin.expect("null device for stdin");
        let mut buf = Vec::new();
        assert_eq!(stdin.read_to_end(&mut buf).unwrap(), 0);
        assert!(redirections.stdout.is_some());
    }
}
