pub const PID_TOKEN: &str = "$$";

/// Replace the first `$$` in the line with the given pid.
/// Later occurrences are left untouched.
pub fn substitute_pid(line: &str, pid: u32) -> String {
    line.replacen(PID_TOKEN, &pid.to_string(), 1)
}

/// Split a line on single spaces. Runs of spaces never produce empty tokens.
pub fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(' ').filter(|token| !token.is_empty())
}

pub fn is_redirect_marker(token: &str) -> bool {
    token == "<" || token == ">"
}

#[derive(Debug, Default, PartialEq)]
pub struct Tokens {
    pub argv: Vec<String>,
    /// Set when argv hit `max_args` and the remaining words were dropped.
    pub truncated: bool,
}

/// Build argv from an already substituted line.
///
/// `<` and `>` are dropped together with the word that follows them and a
/// lone `&` is dropped wherever it appears.
pub fn tokenize(line: &str, max_args: usize) -> Tokens {
    let mut tokens = Tokens::default();
    let mut skip_next = false;

    for token in split_tokens(line) {
        if skip_next {
            skip_next = false;
            continue;
        }

        if is_redirect_marker(token) {
            skip_next = true;
            continue;
        }

        if token == "&" {
            continue;
        }

        if tokens.argv.len() >= max_args {
            tokens.truncated = true;
            break;
        }
        tokens.argv.push(token.to_string());
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_pid() {
        assert_eq!(substitute_pid("echo $$", 4242), "echo 4242");
        assert_eq!(substitute_pid("touch file$$.txt", 7), "touch file7.txt");
        assert_eq!(substitute_pid("echo hi", 7), "echo hi");
    }

    #[test]
    fn test_substitute_only_first() {
        assert_eq!(substitute_pid("echo $$ $$", 12), "echo 12 $$");
        assert_eq!(substitute_pid("echo $$$", 12), "echo 12$");
    }

    #[test]
    fn test_plain_words() {
        let tokens = tokenize("ls -la /tmp", 512);
        assert_eq!(tokens.argv, vec!["ls", "-la", "/tmp"]);
        assert!(!tokens.truncated);
    }

    #[test]
    fn test_collapses_repeated_spaces() {
        let tokens = tokenize("  echo   a  b ", 512);
        assert_eq!(tokens.argv, vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_strips_redirections() {
        let tokens = tokenize("sort < in.txt > out.txt", 512);
        assert_eq!(tokens.argv, vec!["sort"]);

        let tokens = tokenize("wc -l < in.txt extra", 512);
        assert_eq!(tokens.argv, vec!["wc", "-l", "extra"]);
    }

    #[test]
    fn test_strips_background_marker() {
        let tokens = tokenize("sleep 5 &", 512);
        assert_eq!(tokens.argv, vec!["sleep", "5"]);

        // only a standalone & is a marker
        let tokens = tokenize("sleep 5&", 512);
        assert_eq!(tokens.argv, vec!["sleep", "5&"]);
    }

    #[test]
    fn test_dangling_marker() {
        let tokens = tokenize("cat >", 512);
        assert_eq!(tokens.argv, vec!["cat"]);
    }

    #[test]
    fn test_truncates_at_max_args() {
        let tokens = tokenize("echo a b c d", 3);
        assert_eq!(tokens.argv, vec!["echo", "a", "b"]);
        assert!(tokens.truncated);

        let tokens = tokenize("echo a b", 3);
        assert!(!tokens.truncated);
    }
}
