use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_SAVE_DIR,
    DEFAULT_TIMEOUT_SECS,
};
use crate::http::RetryPolicy;
use crate::types::Cli;

/// Runtime settings of the reader, independent of any single request.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Base URL of the Reader API, without a trailing slash.
    pub api_base: String,
    /// Ceiling for each attempt.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub proxy: Option<String>,
    pub verify_ssl: bool,
    pub http2: bool,
    /// Extra headers in "Key: Value" form.
    pub headers: Vec<String>,
    pub output_dir: PathBuf,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::new(
                DEFAULT_MAX_ATTEMPTS,
                Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            ),
            proxy: None,
            verify_ssl: true,
            http2: false,
            headers: Vec::new(),
            output_dir: PathBuf::from(DEFAULT_SAVE_DIR),
        }
    }
}

impl ReaderConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_base: cli.api_base.trim().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(cli.timeout),
            retry: RetryPolicy::new(cli.max_attempts, Duration::from_millis(cli.delay)),
            proxy: cli.proxy.clone(),
            verify_ssl: cli.verify_ssl,
            http2: cli.http2,
            headers: cli.headers.clone(),
            output_dir: PathBuf::from(&cli.output_dir),
        }
    }
}
