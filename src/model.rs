//! Request and result types of a single extraction.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use url::Url;

use crate::error::RequestError;
use crate::types::{OutputFormat, RequestMethod};
use crate::utils::{clean_selectors, normalize_url_scheme};

/// Everything needed to ask the Reader API for one page.
///
/// Built with [`ExtractionRequest::builder`]; the builder validates the
/// target URL and normalizes the selector lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    target_url: String,
    api_key: String,
    method: RequestMethod,
    format: OutputFormat,
    include_images: bool,
    include_videos: bool,
    include_position: bool,
    only_css_selectors: Vec<String>,
    wait_css_selectors: Vec<String>,
    exclude_css_selectors: Vec<String>,
    link_summary: bool,
}

impl ExtractionRequest {
    pub fn builder(target_url: impl Into<String>, api_key: impl Into<String>) -> ExtractionRequestBuilder {
        ExtractionRequestBuilder::new(target_url, api_key)
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn include_images(&self) -> bool {
        self.include_images
    }

    pub fn include_videos(&self) -> bool {
        self.include_videos
    }

    pub fn include_position(&self) -> bool {
        self.include_position
    }

    pub fn only_css_selectors(&self) -> &[String] {
        &self.only_css_selectors
    }

    pub fn wait_css_selectors(&self) -> &[String] {
        &self.wait_css_selectors
    }

    pub fn exclude_css_selectors(&self) -> &[String] {
        &self.exclude_css_selectors
    }

    pub fn link_summary(&self) -> bool {
        self.link_summary
    }
}

/// Builder for [`ExtractionRequest`].
#[derive(Debug, Clone)]
pub struct ExtractionRequestBuilder {
    target_url: String,
    api_key: String,
    method: RequestMethod,
    format: OutputFormat,
    include_images: bool,
    include_videos: bool,
    include_position: bool,
    only_css_selectors: Vec<String>,
    wait_css_selectors: Vec<String>,
    exclude_css_selectors: Vec<String>,
    link_summary: bool,
}

impl ExtractionRequestBuilder {
    fn new(target_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            api_key: api_key.into(),
            method: RequestMethod::default(),
            format: OutputFormat::default(),
            include_images: true,
            include_videos: false,
            include_position: false,
            only_css_selectors: Vec::new(),
            wait_css_selectors: Vec::new(),
            exclude_css_selectors: Vec::new(),
            link_summary: false,
        }
    }

    pub fn method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn include_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    pub fn include_videos(mut self, include: bool) -> Self {
        self.include_videos = include;
        self
    }

    pub fn include_position(mut self, include: bool) -> Self {
        self.include_position = include;
        self
    }

    pub fn only_css_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.only_css_selectors = clean_selectors(selectors);
        self
    }

    pub fn wait_css_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.wait_css_selectors = clean_selectors(selectors);
        self
    }

    pub fn exclude_css_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_css_selectors = clean_selectors(selectors);
        self
    }

    pub fn link_summary(mut self, include: bool) -> Self {
        self.link_summary = include;
        self
    }

    /// Validate the target URL and produce the request.
    ///
    /// A missing scheme is filled in before validation, so `example.com`
    /// becomes `https://example.com`.
    pub fn build(self) -> Result<ExtractionRequest, RequestError> {
        if self.target_url.trim().is_empty() {
            return Err(RequestError::EmptyUrl);
        }

        let target_url = normalize_url_scheme(&self.target_url);
        let parsed = Url::parse(&target_url).map_err(|e| RequestError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RequestError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(RequestError::InvalidUrl(format!("missing host in '{}'", target_url)));
        }

        Ok(ExtractionRequest {
            target_url,
            api_key: self.api_key.trim().to_string(),
            method: self.method,
            format: self.format,
            include_images: self.include_images,
            include_videos: self.include_videos,
            include_position: self.include_position,
            only_css_selectors: self.only_css_selectors,
            wait_css_selectors: self.wait_css_selectors,
            exclude_css_selectors: self.exclude_css_selectors,
            link_summary: self.link_summary,
        })
    }
}

/// Error envelope the Reader API sends as `{code, message, requestId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorEnvelope {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub request_id: Option<String>,
}

impl ApiErrorEnvelope {
    /// Read an envelope out of any JSON object. Returns `None` for arrays,
    /// strings and other non-object values.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let code = object.get("code").and_then(|code| {
            code.as_i64()
                .or_else(|| code.as_f64().map(|f| f.floor() as i64))
        });

        Some(Self {
            code,
            message: object.get("message").map(value_to_text),
            request_id: object.get("requestId").map(value_to_text),
        })
    }

    /// A negative code marks a failure even when the HTTP status is 200.
    pub fn signals_error(&self) -> bool {
        self.code.is_some_and(|code| code < 0)
    }
}

impl fmt::Display for ApiErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "code {}", code)?,
            None => f.write_str("no code")?,
        }
        if let Some(message) = &self.message {
            write!(f, ", {}", message)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request id {})", request_id)?;
        }
        Ok(())
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// What a 200 response body turned out to be.
#[derive(Debug)]
pub enum BodyKind {
    /// A JSON object with a negative `code`.
    ErrorEnvelope(ApiErrorEnvelope),
    /// Valid JSON that is not an error envelope; it is content.
    Json,
    /// Not JSON at all; it is content. Carries the parse error for logging.
    Text(serde_json::Error),
}

impl BodyKind {
    pub fn is_content(&self) -> bool {
        !matches!(self, BodyKind::ErrorEnvelope(_))
    }
}

/// Decide whether a 200 body is extracted content or an error envelope.
///
/// This is the only place the body is parsed.
pub fn classify_body(body: &str) -> BodyKind {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match ApiErrorEnvelope::from_json(&value) {
            Some(envelope) if envelope.signals_error() => BodyKind::ErrorEnvelope(envelope),
            _ => BodyKind::Json,
        },
        Err(err) => BodyKind::Text(err),
    }
}

/// Classification of a failed extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    ConnectionError,
    ApplicationError,
    UnknownError,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "Request timed out",
            FailureKind::ConnectionError => "Connection error",
            FailureKind::ApplicationError => "Request failed",
            FailureKind::UnknownError => "Unexpected error",
        }
    }
}

/// A classified failure with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of [`crate::processor::Reader::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success { saved_path: PathBuf, content: String },
    Failure(Failure),
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ExtractionResult::Failure(failure) => Some(failure),
            ExtractionResult::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = ExtractionRequest::builder("https://example.com", "key").build().unwrap();
        assert_eq!(request.target_url(), "https://example.com");
        assert_eq!(request.method(), RequestMethod::Get);
        assert_eq!(request.format(), OutputFormat::Markdown);
        assert!(request.include_images());
        assert!(!request.include_videos());
        assert!(!request.include_position());
        assert!(!request.link_summary());
        assert!(request.only_css_selectors().is_empty());
    }

    #[test]
    fn test_builder_rejects_empty_url() {
        let err = ExtractionRequest::builder("   ", "key").build().unwrap_err();
        assert_eq!(err, RequestError::EmptyUrl);
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let err = ExtractionRequest::builder("ftp://example.com/file", "key")
            .build()
            .unwrap_err();
        assert_eq!(err, RequestError::UnsupportedScheme("ftp".to_string()));
    }

    #[test]
    fn test_builder_adds_missing_scheme() {
        let request = ExtractionRequest::builder("example.com/page", "key").build().unwrap();
        assert_eq!(request.target_url(), "https://example.com/page");
    }

    #[test]
    fn test_builder_cleans_selectors() {
        let request = ExtractionRequest::builder("https://example.com", "key")
            .only_css_selectors([" article ", "", ".rich_media_content"])
            .exclude_css_selectors(Vec::<String>::new())
            .build()
            .unwrap();
        assert_eq!(request.only_css_selectors(), ["article", ".rich_media_content"]);
        assert!(request.exclude_css_selectors().is_empty());
    }

    #[test]
    fn test_classify_body_error_envelope() {
        let body = r#"{"code": -20001, "message": "m", "requestId": "r"}"#;
        match classify_body(body) {
            BodyKind::ErrorEnvelope(envelope) => {
                assert_eq!(envelope.code, Some(-20001));
                assert_eq!(envelope.message.as_deref(), Some("m"));
                assert_eq!(envelope.request_id.as_deref(), Some("r"));
            }
            other => panic!("expected error envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_body_content() {
        assert!(matches!(classify_body("# Title\n\nBody"), BodyKind::Text(_)));
        assert!(matches!(classify_body(r#"{"code": 0, "data": "x"}"#), BodyKind::Json));
        assert!(matches!(classify_body(r#"{"title": "no code"}"#), BodyKind::Json));
        assert!(matches!(classify_body(r#"[{"code": -1}]"#), BodyKind::Json));
        assert!(matches!(classify_body(r#"{"code": "-1"}"#), BodyKind::Json));
        assert!(classify_body("plain").is_content());
    }

    #[test]
    fn test_envelope_display() {
        let envelope = ApiErrorEnvelope {
            code: Some(-30001),
            message: Some("bad key".to_string()),
            request_id: Some("abc".to_string()),
        };
        assert_eq!(envelope.to_string(), "code -30001, bad key (request id abc)");
        assert_eq!(ApiErrorEnvelope::default().to_string(), "no code");
    }
}
