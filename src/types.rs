use clap::{ArgAction, Parser};
use serde::Serialize;

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_SAVE_DIR,
    DEFAULT_TIMEOUT_SECS,
};

/// Output format requested from the Reader API.
///
/// The name doubles as the extension of the saved file.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Md,
    Text,
    Txt,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Md => "md",
            OutputFormat::Text => "text",
            OutputFormat::Txt => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the request is delivered to the Reader API.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMethod {
    /// Target URL in the path, everything else in the query string.
    #[default]
    Get,
    /// JSON body with a bearer token.
    Post,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        }
    }
}

/// CLI arguments structure
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Web page to extract (scheme optional, defaults to https).
    #[arg(required_unless_present = "mcp")]
    pub url: Option<String>,

    // READER
    /// Reader API key.
    #[arg(long, env = "READER_API_KEY", hide_env_values = true, help_heading = "READER")]
    pub api_key: Option<String>,

    /// Reader API base URL.
    #[arg(long, env = "READER_API_BASE", default_value = DEFAULT_API_BASE, help_heading = "READER")]
    pub api_base: String,

    /// Request method used to call the Reader API.
    #[arg(short = 'X', long, value_enum, default_value_t = RequestMethod::Get, help_heading = "READER")]
    pub method: RequestMethod,

    /// Format of the extracted content.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown, help_heading = "READER")]
    pub format: OutputFormat,

    /// Include images in the extracted content.
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "READER")]
    pub include_images: bool,

    /// Include videos in the extracted content.
    #[arg(long, help_heading = "READER")]
    pub include_videos: bool,

    /// Include element position information.
    #[arg(long, help_heading = "READER")]
    pub include_position: bool,

    /// Append a summary of the links found on the page.
    #[arg(long, help_heading = "READER")]
    pub link_summary: bool,

    /// Only keep content matching these CSS selectors (e.g., "article,.content").
    #[arg(long = "only-css", value_delimiter = ',', help_heading = "READER")]
    pub only_css_selectors: Vec<String>,

    /// Wait for these CSS selectors before extracting.
    #[arg(long = "wait-css", value_delimiter = ',', help_heading = "READER")]
    pub wait_css_selectors: Vec<String>,

    /// Drop content matching these CSS selectors.
    #[arg(long = "exclude-css", value_delimiter = ',', help_heading = "READER")]
    pub exclude_css_selectors: Vec<String>,

    // NETWORK
    /// Timeout for each attempt in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, help_heading = "NETWORK")]
    pub timeout: u64,

    /// Maximum number of attempts, including the first one.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..), help_heading = "NETWORK")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds (doubled on every retry).
    #[arg(long, default_value_t = DEFAULT_BASE_DELAY_MS, help_heading = "NETWORK")]
    pub delay: u64,

    /// Use a proxy for requests (e.g., "http://127.0.0.1:8080").
    #[arg(long, help_heading = "NETWORK")]
    pub proxy: Option<String>,

    /// Verify SSL certificates.
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "NETWORK")]
    pub verify_ssl: bool,

    // HTTP
    /// Use HTTP/2 for requests.
    #[arg(long, help_heading = "HTTP")]
    pub http2: bool,

    /// Custom headers to add to the request (e.g., "User-Agent: my-app").
    #[arg(short = 'H', long, help_heading = "HTTP")]
    pub headers: Vec<String>,

    // OUTPUT
    /// Directory where extracted content is saved.
    #[arg(short, long, default_value = DEFAULT_SAVE_DIR, help_heading = "OUTPUT")]
    pub output_dir: String,

    /// Print the outgoing request (API key masked) before sending it.
    #[arg(long, help_heading = "OUTPUT")]
    pub include_req: bool,

    /// Disable color output.
    #[arg(long, help_heading = "OUTPUT")]
    pub no_color: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long, help_heading = "OUTPUT")]
    pub verbose: bool,

    // MCP
    /// Run in MCP (Model Context Protocol) server mode.
    #[arg(long, help_heading = "MCP")]
    pub mcp: bool,
}
