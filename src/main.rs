use std::env;
use std::io::{self, IsTerminal};
use std::process;

use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod error;
mod jobs;
mod launcher;
mod prompt;
mod redirects;
mod shell;
mod signal_handler;
mod status;
mod tokenizer;

use config::Config;

fn print_help() {
    println!("smallsh - a small interactive shell");
    println!();
    println!("Usage: smallsh [OPTIONS]");
    println!("  -h, --help       Print this help");
    println!("  -v, --version    Print version");
    println!();
    println!("Built-ins: cd [dir], status, exit. End a command with '&' to run it in the background.");
    println!("Ctrl-Z toggles foreground-only mode.");
}

fn print_version() {
    println!("smallsh {}", env!("CARGO_PKG_VERSION"));
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        process::exit(0);
    }

    if args.iter().any(|a| a == "-v" || a == "--version" || a == "-V") {
        print_version();
        process::exit(0);
    }

    // keep piped output byte-exact
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = Config::from_env();
    init_logging(&config);

    let mut shell = shell::Shell::new(config);
    process::exit(shell.run());
}
