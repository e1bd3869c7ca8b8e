pub mod client;
pub mod headers;
pub mod request;
pub mod retry;
pub mod transport;

pub use client::build_http_client;
pub use headers::parse_headers;
pub use request::{ApiRequest, build_api_request, build_request, format_raw_request};
pub use retry::RetryPolicy;
pub use transport::{ApiResponse, ReqwestTransport, Transport};
