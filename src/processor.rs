use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

use crate::classifier::classify;
use crate::config::ReaderConfig;
use crate::error::{ReaderError, TransportError};
use crate::http::{
    ApiRequest, ApiResponse, ReqwestTransport, RetryPolicy, Transport, build_api_request,
    build_http_client,
};
use crate::model::{ApiErrorEnvelope, BodyKind, ExtractionRequest, ExtractionResult, classify_body};
use crate::output::ResultSink;
use crate::telemetry::Telemetry;
use crate::utils::{parse_retry_after, wait};

/// Runs an extraction end to end: build the call, send it with retries,
/// interpret the answer and save the content.
pub struct Reader {
    transport: Arc<dyn Transport>,
    config: ReaderConfig,
    sink: ResultSink,
    telemetry: Arc<dyn Telemetry>,
}

impl Reader {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: ReaderConfig,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        let sink = ResultSink::new(config.output_dir.clone());
        Self {
            transport,
            config,
            sink,
            telemetry,
        }
    }

    /// Reader talking to the real API through reqwest.
    pub fn from_config(config: ReaderConfig, telemetry: Arc<dyn Telemetry>) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self::new(
            Arc::new(ReqwestTransport::new(client)),
            config,
            telemetry,
        ))
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Run one extraction. Never fails: every error ends up in
    /// [`ExtractionResult::Failure`].
    pub async fn read(&self, request: &ExtractionRequest) -> ExtractionResult {
        self.telemetry
            .info(&format!("Processing URL: {}", request.target_url()));
        self.telemetry
            .info(&format!("Request method: {}", request.method().as_str()));

        match self.run(request).await {
            Ok(result) => result,
            Err(err) => {
                let failure = classify(&err);
                match &err {
                    ReaderError::Transport(TransportError::Timeout(_))
                    | ReaderError::Transport(TransportError::Connect(_))
                    | ReaderError::Api { .. }
                    | ReaderError::Http { .. } => {
                        self.telemetry
                            .error(&format!("Request failed:\n{}", failure.message));
                    }
                    _ => {
                        self.telemetry.error(&format!("{} ({:?})", failure.message, err));
                    }
                }
                self.telemetry.progress(1.0, failure.kind.label());
                ExtractionResult::Failure(failure)
            }
        }
    }

    async fn run(&self, request: &ExtractionRequest) -> Result<ExtractionResult, ReaderError> {
        self.telemetry.progress(0.0, "Preparing request");
        self.telemetry.debug(&format!(
            "CSS selectors: only {:?}, wait {:?}, exclude {:?}",
            request.only_css_selectors(),
            request.wait_css_selectors(),
            request.exclude_css_selectors()
        ));

        let api_request = build_api_request(&self.config.api_base, request)?;
        self.telemetry.progress(0.2, "Request parameters prepared");

        self.telemetry.info(&format!(
            "Sending {} request...",
            api_request.method.as_str()
        ));
        self.telemetry.progress(
            0.4,
            &format!("Sending {} request", api_request.method.as_str()),
        );
        let response = self.send_with_retry(&api_request).await?;

        self.telemetry
            .info(&format!("Received response: HTTP {}", response.status));
        self.telemetry.progress(0.6, "Processing response");
        let content = self.interpret(response)?;

        self.telemetry.progress(0.8, "Saving result");
        let saved_path = self
            .sink
            .save(request.target_url(), &content, request.format())
            .await?;
        self.telemetry
            .info(&format!("Result saved to: {}", saved_path.display()));

        self.telemetry.progress(1.0, "Done");
        Ok(ExtractionResult::Success {
            saved_path,
            content,
        })
    }

    /// Send `api_request`, retrying transport failures and retryable statuses.
    ///
    /// Returns the last response received, whatever its status, once it is
    /// not retryable or the attempt budget is spent.
    pub async fn send_with_retry(
        &self,
        api_request: &ApiRequest,
    ) -> Result<ApiResponse, TransportError> {
        let policy: &RetryPolicy = &self.config.retry;
        let mut attempt = 1;

        loop {
            let outcome = self.transport.send(api_request).await;

            let retry_after = match &outcome {
                Ok(response) if RetryPolicy::is_retryable_status(response.status) => {
                    self.telemetry.warn(&format!(
                        "Attempt {}/{} got HTTP {}",
                        attempt,
                        policy.max_attempts(),
                        response.status
                    ));
                    Some(
                        response
                            .retry_after
                            .as_deref()
                            .and_then(|value| parse_retry_after(value, Utc::now())),
                    )
                }
                Err(err) if err.is_retryable() => {
                    self.telemetry.warn(&format!(
                        "Attempt {}/{} failed: {}",
                        attempt,
                        policy.max_attempts(),
                        err
                    ));
                    Some(None)
                }
                _ => None,
            };
            let Some(retry_after) = retry_after else {
                return outcome;
            };

            if !policy.has_attempts_left(attempt) {
                self.telemetry
                    .error(&format!("Giving up after {} attempts", attempt));
                return outcome;
            }

            let delay = policy.delay_after(attempt, retry_after);
            self.telemetry
                .debug(&format!("Retrying in {:.2}s", delay.as_secs_f64()));
            wait(delay).await;
            attempt += 1;
        }
    }

    /// Turn the final response into content or an error.
    fn interpret(&self, response: ApiResponse) -> Result<String, ReaderError> {
        if response.status != 200 {
            let envelope = match serde_json::from_str::<serde_json::Value>(&response.body) {
                Ok(value) => ApiErrorEnvelope::from_json(&value),
                Err(parse_error) => {
                    self.telemetry.debug(&format!(
                        "Error body is not JSON ({}), reporting it raw",
                        parse_error
                    ));
                    None
                }
            };
            return Err(match envelope {
                Some(envelope) => ReaderError::Api {
                    status: response.status,
                    envelope,
                },
                None => ReaderError::Http {
                    status: response.status,
                    body: response.body,
                },
            });
        }

        match classify_body(&response.body) {
            BodyKind::ErrorEnvelope(envelope) => Err(ReaderError::Api {
                status: response.status,
                envelope,
            }),
            BodyKind::Json => Ok(response.body),
            BodyKind::Text(parse_error) => {
                self.telemetry
                    .debug(&format!("Response body is not JSON ({}), keeping it as text", parse_error));
                Ok(response.body)
            }
        }
    }
}
