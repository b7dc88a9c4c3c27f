use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;
use crate::errors::{AppError, AppResult};

/// Outcome class of a single completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Success,
    HttpError(u16),
    TransportError,
    Timeout,
    /// 200 response whose payload lacked the expected content.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub text: Option<String>,
    pub status: CompletionStatus,
}

impl CompletionResult {
    fn success(text: String) -> Self {
        Self {
            text: Some(text),
            status: CompletionStatus::Success,
        }
    }

    fn failed(status: CompletionStatus) -> Self {
        Self { text: None, status }
    }
}

/// Sends one prompt and yields the model's text, or nothing on any failure.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Option<String>;
}

/// Opens the completion session shared by all categories of one request.
/// The session is released when the last handle to it is dropped.
pub trait SessionProvider: Send + Sync {
    fn open_session(&self) -> AppResult<Arc<dyn CompletionClient>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self {
            max_attempts: settings.max_retries.max(1),
            backoff: settings.retry_backoff(),
        }
    }
}

/// Calls `client` until it yields text or `policy.max_attempts` calls have
/// failed, sleeping `backoff * attempt` between attempts.
pub async fn complete_with_retry(
    client: &dyn CompletionClient,
    prompt: &str,
    policy: RetryPolicy,
) -> Option<String> {
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        if let Some(text) = client.complete(prompt).await {
            return Some(text);
        }

        if attempt < max_attempts {
            log::warn!(
                "Completion attempt failed. Retrying ({}/{})...",
                attempt,
                max_attempts
            );
            tokio::time::sleep(policy.backoff * attempt).await;
        }
    }

    log::error!(
        "{}",
        AppError::UpstreamUnavailable(format!(
            "maximum retry attempts ({}) reached",
            max_attempts
        ))
    );
    None
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

/// Content of the first choice, if the payload has one.
pub fn extract_content(body: &str) -> Option<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body).ok()?;
    response
        .choices
        .into_iter()
        .next()?
        .message?
        .content
        .filter(|content| !content.trim().is_empty())
}

fn upstream_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .ok()?
        .error?
        .message
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Completion session over a pooled HTTP client.
pub struct ChatCompletionSession {
    http: reqwest::Client,
    settings: Arc<LlmSettings>,
}

impl ChatCompletionSession {
    pub fn open(settings: Arc<LlmSettings>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        log::debug!(
            "Opened completion session to {} (model {}, key {})",
            settings.endpoint_url,
            settings.model_name,
            settings.masked_credential()
        );

        Ok(Self { http, settings })
    }

    /// Performs exactly one request and classifies the outcome.
    pub async fn send(&self, prompt: &str) -> CompletionResult {
        let settings = &self.settings;
        let payload = ChatCompletionRequest {
            model: &settings.model_name,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &settings.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            top_p: settings.top_p,
        };

        log::debug!("Making completion call to {}", settings.endpoint_url);
        log::debug!("Prompt: {}", preview(prompt, 50));

        let mut request = self
            .http
            .post(&settings.endpoint_url)
            .header(ACCEPT, "application/json")
            .timeout(settings.request_timeout())
            .json(&payload);
        if let Some(key) = &settings.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return Self::transport_failure(err),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return Self::transport_failure(err),
        };
        log::debug!("Response status: {}", status);

        if status == StatusCode::OK {
            return match extract_content(&body) {
                Some(content) => {
                    log::debug!("Response content: {}", preview(&content, 100));
                    CompletionResult::success(content)
                }
                None => {
                    log::error!(
                        "{}",
                        AppError::MalformedUpstreamResponse(format!(
                            "missing choices[0].message.content in {}",
                            preview(&body, 500)
                        ))
                    );
                    CompletionResult::failed(CompletionStatus::Malformed)
                }
            };
        }

        self.log_http_failure(status, &body);
        CompletionResult::failed(CompletionStatus::HttpError(status.as_u16()))
    }

    fn transport_failure(err: reqwest::Error) -> CompletionResult {
        if err.is_timeout() {
            log::error!("Completion call timed out: {}", err);
            CompletionResult::failed(CompletionStatus::Timeout)
        } else {
            log::error!("Completion call error: {}", err);
            CompletionResult::failed(CompletionStatus::TransportError)
        }
    }

    fn log_http_failure(&self, status: StatusCode, body: &str) {
        match status {
            StatusCode::UNAUTHORIZED => {
                log::error!("API error 401 - Unauthorized. Check your API key.")
            }
            StatusCode::NOT_FOUND => log::error!(
                "API error 404 - Endpoint not found: {}",
                self.settings.endpoint_url
            ),
            StatusCode::BAD_REQUEST => log::error!("API error 400 - Bad Request"),
            StatusCode::TOO_MANY_REQUESTS => log::error!("API error 429 - Rate limited"),
            status if status.is_server_error() => {
                log::error!("API error {} - Upstream server error", status.as_u16())
            }
            status => log::error!("API error: {}", status.as_u16()),
        }

        match upstream_error_message(body) {
            Some(message) => log::error!("Error message: {}", message),
            None if !body.is_empty() => log::error!("Response details: {}", preview(body, 500)),
            None => {}
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionSession {
    async fn complete(&self, prompt: &str) -> Option<String> {
        self.send(prompt).await.text
    }
}

impl Drop for ChatCompletionSession {
    fn drop(&mut self) {
        log::debug!("Closed completion session to {}", self.settings.endpoint_url);
    }
}

/// Client used when no credential is configured; every call fails immediately.
pub struct OfflineClient;

#[async_trait]
impl CompletionClient for OfflineClient {
    async fn complete(&self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Opens a [`ChatCompletionSession`] per request, or an [`OfflineClient`]
/// when the credential is missing.
pub struct ChatCompletionProvider {
    settings: Arc<LlmSettings>,
}

impl ChatCompletionProvider {
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl SessionProvider for ChatCompletionProvider {
    fn open_session(&self) -> AppResult<Arc<dyn CompletionClient>> {
        if !self.settings.has_credential() {
            log::warn!("No API credential configured, serving default content");
            return Ok(Arc::new(OfflineClient));
        }

        let session = ChatCompletionSession::open(Arc::clone(&self.settings))?;
        Ok(Arc::new(session))
    }
}

/// Hands out the same client for every request.
pub struct SharedClientProvider {
    client: Arc<dyn CompletionClient>,
}

impl SharedClientProvider {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

impl SessionProvider for SharedClientProvider {
    fn open_session(&self) -> AppResult<Arc<dyn CompletionClient>> {
        Ok(Arc::clone(&self.client))
    }
}
