/// Reader API constants
pub const DEFAULT_API_BASE: &str = "https://api.example.com/web-reader";
pub const READ_ENDPOINT: &str = "read";

/// HTTP constants
pub const DEFAULT_REDIRECT_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const HTTP_VERSION_2: &str = "HTTP/2.0";
pub const HTTP_VERSION_1_1: &str = "HTTP/1.1";
pub const USER_AGENT: &str = concat!("webreader/", env!("CARGO_PKG_VERSION"));

/// Retry constants
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY_MS: u64 = 2_000;
pub const RETRYABLE_STATUS_CODES: [u16; 4] = [500, 502, 503, 504];
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Error code the Reader API uses for a transient server fault
pub const TRANSIENT_SERVER_ERROR_CODE: i64 = -20001;

/// Result sink constants
pub const DEFAULT_SAVE_DIR: &str = "saved_results";
pub const FILENAME_URL_PREFIX_CHARS: usize = 30;
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
pub const SAVED_LABEL: &str = "Result saved to: ";

/// Value shown instead of the API key in printed requests
pub const MASKED_SECRET: &str = "********";
