//! Extract web pages through a Reader API and save them to disk.
//!
//! The pipeline is [`Reader::read`]: build the API call from an
//! [`ExtractionRequest`], send it with bounded exponential backoff, separate
//! error envelopes from content, and write the content to
//! `saved_results/{url-prefix}_{timestamp}.{format}`. It always returns an
//! [`ExtractionResult`]; errors are classified, never propagated.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod mcp;
pub mod model;
pub mod output;
pub mod processor;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use config::ReaderConfig;
pub use error::{ReaderError, RequestError, TransportError};
pub use model::{ExtractionRequest, ExtractionResult, Failure, FailureKind};
pub use processor::Reader;
pub use telemetry::{Telemetry, TracingTelemetry};
pub use types::{Cli, OutputFormat, RequestMethod};
