pub mod formatter;
pub mod sink;

pub use formatter::format_result;
pub use sink::{ResultSink, derive_filename, sanitize_url_prefix};
