use std::io::{self, Write};

use colored::Colorize;

pub struct Prompt {
    prefix: String,
}

impl Prompt {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn display(&self) {
        print!("{}", self.prefix);
        flush();
    }
}

/// Print a line for the user and flush right away so it lands before the
/// next prompt.
pub fn say(message: &str) {
    println!("{}", message);
    flush();
}

/// Print a `smallsh:` diagnostic.
pub fn diagnostic(message: &str) {
    println!("{} {}", "smallsh:".red().bold(), message);
    flush();
}

fn flush() {
    let _ = io::stdout().flush();
}
