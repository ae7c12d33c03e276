use crate::redirects::RedirectSpec;
use crate::tokenizer::{self, substitute_pid};

/// A line with its pid substitution applied, split into argv and the
/// redirections it asks for.
#[derive(Debug, PartialEq)]
pub struct ParsedLine {
    pub argv: Vec<String>,
    pub redirects: RedirectSpec,
    pub truncated: bool,
}

impl ParsedLine {
    pub fn parse(line: &str, pid: u32, max_args: usize) -> Self {
        let line = substitute_pid(line, pid);
        let tokens = tokenizer::tokenize(&line, max_args);
        ParsedLine {
            argv: tokens.argv,
            redirects: RedirectSpec::scan(&line),
            truncated: tokens.truncated,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Command {
    /// Blank lines and comments.
    Skip,
    Cd(Option<String>),
    Status,
    Exit,
    External { line: ParsedLine, background: bool },
}

impl Command {
    /// Classify one input line (without its newline).
    ///
    /// `status` is recognised anywhere in the line. A trailing `&` asks for a
    /// background launch; foreground-only mode is applied by the caller.
    pub fn parse(input: &str, pid: u32, max_args: usize) -> Self {
        if input.trim().is_empty() || input.starts_with('#') {
            return Command::Skip;
        }

        let parsed = ParsedLine::parse(input, pid, max_args);

        if parsed.argv.first().map(String::as_str) == Some("cd") {
            return Command::Cd(parsed.argv.get(1).cloned());
        }

        if input.contains("status") {
            return Command::Status;
        }

        if input == "exit" {
            return Command::Exit;
        }

        if parsed.argv.is_empty() {
            return Command::Skip;
        }

        Command::External {
            background: input.ends_with('&'),
            line: parsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Command {
        Command::parse(input, 321, 512)
    }

    #[test]
    fn test_skips_blank_and_comments() {
        assert_eq!(parse(""), Command::Skip);
        assert_eq!(parse("   "), Command::Skip);
        assert_eq!(parse("# ls -la"), Command::Skip);
        assert_eq!(parse("&"), Command::Skip);
    }

    #[test]
    fn test_cd_forms() {
        assert_eq!(parse("cd"), Command::Cd(None));
        assert_eq!(parse("cd /tmp"), Command::Cd(Some("/tmp".to_string())));
        assert_eq!(parse("cd dir$$"), Command::Cd(Some("dir321".to_string())));
        assert_eq!(parse("cd a b"), Command::Cd(Some("a".to_string())));
    }

    #[test]
    fn test_echo_cd_is_external() {
        assert!(matches!(parse("echo cd"), Command::External { .. }));
        assert!(matches!(parse("cdrecord"), Command::External { .. }));
    }

    #[test]
    fn test_status_substring() {
        assert_eq!(parse("status"), Command::Status);
        assert_eq!(parse("status &"), Command::Status);
        assert_eq!(parse("mystatusfile"), Command::Status);
    }

    #[test]
    fn test_exit_exact() {
        assert_eq!(parse("exit"), Command::Exit);
        assert!(matches!(parse("exit 1"), Command::External { .. }));
    }

    #[test]
    fn test_background_flag() {
        let Command::External { line, background } = parse("sleep 5 &") else {
            panic!("expected external command");
        };
        assert!(background);
        assert_eq!(line.argv, vec!["sleep", "5"]);

        let Command::External { background, .. } = parse("sleep 5 & ") else {
            panic!("expected external command");
        };
        assert!(!background);
    }

    #[test]
    fn test_external_with_redirects_and_pid() {
        let Command::External { line, background } = parse("ls > out$$.txt") else {
            panic!("expected external command");
        };
        assert!(!background);
        assert_eq!(line.argv, vec!["ls"]);
        assert_eq!(line.redirects.output.as_deref(), Some("out321.txt"));
        assert!(line.redirects.input.is_none());
    }

    #[test]
    fn test_truncation_is_flagged() {
        let Command::External { line, .. } = Command::parse("echo a b c", 1, 2) else {
            panic!("expected external command");
        };
        assert_eq!(line.argv, vec!["echo", "a"]);
        assert!(line.truncated);
    }
}
