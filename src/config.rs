use std::env;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = ": ";
pub const MAX_ARGS: usize = 512;
pub const NULL_DEVICE: &str = "/dev/null";
pub const LOG_ENV: &str = "SMALLSH_LOG";

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    pub max_args: usize,
    pub null_device: PathBuf,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_args: MAX_ARGS,
            null_device: PathBuf::from(NULL_DEVICE),
            log_filter: "off".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(filter) = env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }
        config
    }
}
