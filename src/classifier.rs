use crate::constants::TRANSIENT_SERVER_ERROR_CODE;
use crate::error::{ReaderError, TransportError};
use crate::model::{ApiErrorEnvelope, ExtractionResult, Failure, FailureKind};

/// Map a pipeline error to its classification and user-facing message.
pub fn classify(error: &ReaderError) -> Failure {
    match error {
        ReaderError::Transport(TransportError::Timeout(_)) => Failure {
            kind: FailureKind::Timeout,
            message: "Request timed out. Please try again later or check your network connection."
                .to_string(),
        },
        ReaderError::Transport(TransportError::Connect(_)) => Failure {
            kind: FailureKind::ConnectionError,
            message: "Network connection error. Please check that your network connection is working."
                .to_string(),
        },
        ReaderError::Api { status, envelope } => Failure {
            kind: FailureKind::ApplicationError,
            message: describe_envelope(*status, envelope),
        },
        ReaderError::Http { status, body } => Failure {
            kind: FailureKind::ApplicationError,
            message: format!("Request failed: HTTP {}\n{}", status, body),
        },
        other => Failure {
            kind: FailureKind::UnknownError,
            message: format!("An error occurred: {}", other),
        },
    }
}

impl From<ReaderError> for ExtractionResult {
    fn from(error: ReaderError) -> Self {
        ExtractionResult::Failure(classify(&error))
    }
}

fn is_transient(status: u16, envelope: &ApiErrorEnvelope) -> bool {
    envelope.code == Some(TRANSIENT_SERVER_ERROR_CODE) || status >= 500
}

/// Error details plus remediation steps for an API error envelope.
pub fn describe_envelope(status: u16, envelope: &ApiErrorEnvelope) -> String {
    let code = envelope
        .code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let message = envelope.message.as_deref().unwrap_or("Unknown error");
    let request_id = envelope.request_id.as_deref().unwrap_or("none");

    let first_step = if is_transient(status, envelope) {
        "1. The server reported a transient fault; please try again later".to_string()
    } else {
        format!(
            "1. If this is a server error ({}), please try again later",
            TRANSIENT_SERVER_ERROR_CODE
        )
    };

    format!(
        "Error details:\n\
         - HTTP status: {}\n\
         - Error code: {}\n\
         - Error message: {}\n\
         - Request ID: {}\n\
         \n\
         Possible solutions:\n\
         {}\n\
         2. Check that your API key is correct\n\
         3. Make sure the URL is reachable\n\
         4. Check that your network connection is working",
        status, code, message, request_id, first_step
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;

    fn envelope(code: i64) -> ApiErrorEnvelope {
        ApiErrorEnvelope {
            code: Some(code),
            message: Some("m".to_string()),
            request_id: Some("r".to_string()),
        }
    }

    #[test]
    fn test_classify_transport_errors() {
        let timeout = classify(&TransportError::Timeout("deadline".into()).into());
        assert_eq!(timeout.kind, FailureKind::Timeout);
        assert!(timeout.message.contains("try again later"));

        let connect = classify(&TransportError::Connect("refused".into()).into());
        assert_eq!(connect.kind, FailureKind::ConnectionError);
        assert!(connect.message.contains("network"));

        let other = classify(&TransportError::Other("decode".into()).into());
        assert_eq!(other.kind, FailureKind::UnknownError);
        assert!(other.message.contains("decode"));
    }

    #[test]
    fn test_classify_api_envelope() {
        let failure = classify(&ReaderError::Api {
            status: 200,
            envelope: envelope(-20001),
        });
        assert_eq!(failure.kind, FailureKind::ApplicationError);
        assert!(failure.message.contains("Error code: -20001"));
        assert!(failure.message.contains("Error message: m"));
        assert!(failure.message.contains("Request ID: r"));
        assert!(failure.message.contains("transient fault"));
        assert!(failure.message.contains("API key"));
    }

    #[test]
    fn test_classify_api_envelope_non_transient() {
        let failure = classify(&ReaderError::Api {
            status: 401,
            envelope: ApiErrorEnvelope {
                code: Some(-30001),
                message: None,
                request_id: None,
            },
        });
        assert!(failure.message.contains("Error message: Unknown error"));
        assert!(failure.message.contains("Request ID: none"));
        assert!(!failure.message.contains("transient fault"));
    }

    #[test]
    fn test_classify_raw_http_error() {
        let failure = classify(&ReaderError::Http {
            status: 404,
            body: "<html>not found</html>".to_string(),
        });
        assert_eq!(failure.kind, FailureKind::ApplicationError);
        assert_eq!(failure.message, "Request failed: HTTP 404\n<html>not found</html>");
    }

    #[test]
    fn test_classify_unknown() {
        let failure = classify(&RequestError::EmptyUrl.into());
        assert_eq!(failure.kind, FailureKind::UnknownError);
        assert!(failure.message.contains("must not be empty"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let failure = classify(&ReaderError::Save(io));
        assert_eq!(failure.kind, FailureKind::UnknownError);
        assert!(failure.message.contains("read-only"));
    }

    #[test]
    fn test_invalid_request_renders_as_failure() {
        let result = ExtractionResult::from(ReaderError::from(RequestError::UnsupportedScheme(
            "ftp".to_string(),
        )));
        assert!(!result.is_success());
        assert_eq!(result.failure().unwrap().kind, FailureKind::UnknownError);
        assert_eq!(
            result.to_string(),
            "An error occurred: Unsupported URL scheme 'ftp' (expected http or https)"
        );
    }
}
