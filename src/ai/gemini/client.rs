use super::types::ApiErrorBody;
use crate::credentials::CredentialStore;
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_retry::strategy::ExponentialBackoff;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Total attempts per logical call, counting the first.
const MAX_ATTEMPTS: usize = 3;

/// Gemini REST client owning the request lifecycle: credential resolution,
/// the shared rate-limit cooldown, the bounded 429 retry loop, and the
/// classification of non-success responses.
pub struct GeminiHttpClient {
    client: Client,
    credentials: Arc<CredentialStore>,
    model: String,
    base_url: String,
    timeout: Duration,
    /// Earliest instant a new request may be issued. Spans logical calls.
    cooldown_until: Mutex<Option<Instant>>,
    backoff_unit_ms: u64,
    backoff_floor: Duration,
}

/// Outcome of a single request attempt inside the retry loop.
enum Attempt<Resp> {
    Success(Resp),
    Retry(Duration),
    Fail(Error),
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-flash`),
    /// not a `models/...`-prefixed path segment.
    pub fn new(credentials: Arc<CredentialStore>, model: String, timeout: Duration) -> Self {
        Self::new_with_client(credentials, model, timeout, Client::new())
    }

    pub fn new_with_client(
        credentials: Arc<CredentialStore>,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            credentials,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            cooldown_until: Mutex::new(None),
            backoff_unit_ms: 1000,
            backoff_floor: Duration::from_secs(1),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Shrink backoff delays to milliseconds so retry tests run fast.
    #[cfg(test)]
    fn with_fast_backoff(mut self) -> Self {
        self.backoff_unit_ms = 1;
        self.backoff_floor = Duration::from_millis(1);
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Calls Gemini's `generateContent` endpoint with rate-limit retries.
    ///
    /// A 429 response schedules a backoff (the `Retry-After` header wins over
    /// the exponential schedule), arms the shared cooldown, and retries up to
    /// [`MAX_ATTEMPTS`] total attempts. Any other non-2xx response is
    /// terminal and classified into an [`Error`] variant.
    pub async fn generate_content<Req, Resp>(&self, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let api_key = self.credentials.resolve()?;
        let url = format!(
            "{}/v1/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        self.wait_for_cooldown().await;

        let mut backoff = ExponentialBackoff::from_millis(2).factor(self.backoff_unit_ms);
        for attempt in 0..MAX_ATTEMPTS {
            match self.attempt(&url, request, &mut backoff).await {
                Attempt::Success(response) => return Ok(response),
                Attempt::Retry(delay) => {
                    tracing::warn!(
                        "Gemini rate limited (attempt {}/{}), backing off for {:?}",
                        attempt + 1,
                        MAX_ATTEMPTS,
                        delay
                    );
                    self.arm_cooldown(delay);
                    tokio::time::sleep(delay).await;
                }
                Attempt::Fail(error) => return Err(error),
            }
        }

        Err(Error::RetryExhausted)
    }

    async fn attempt<Req, Resp>(
        &self,
        url: &str,
        request: &Req,
        backoff: &mut ExponentialBackoff,
    ) -> Attempt<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = match self
            .client
            .post(url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to reach Gemini API: {}", e);
                return Attempt::Fail(Error::Network(e));
            }
        };

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let delay = parse_retry_after(retry_after_header(&response).as_deref())
                .unwrap_or_else(|| {
                    backoff.next().unwrap_or(Duration::from_secs(8)) + self.backoff_floor
                });
            return Attempt::Retry(delay);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to read Gemini response body: {}", e);
                return Attempt::Fail(Error::Network(e));
            }
        };

        if status.is_success() {
            return match serde_json::from_str(&body) {
                Ok(parsed) => Attempt::Success(parsed),
                Err(e) => {
                    tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
                    Attempt::Fail(Error::Parse(format!(
                        "Failed to parse Gemini response: {}",
                        e
                    )))
                }
            };
        }

        let body_message = parse_error_message(&body);
        tracing::error!(
            "Gemini API error (status {}): {}",
            status,
            body_message.as_deref().unwrap_or(&body)
        );

        Attempt::Fail(match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized,
            StatusCode::FORBIDDEN => Error::Forbidden(body_message.unwrap_or_else(|| {
                "Forbidden: quota exceeded or access denied for this project or key.".to_string()
            })),
            _ => Error::Provider(
                body_message
                    .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
            ),
        })
    }

    /// Suspend until the shared cooldown, if armed, has elapsed.
    async fn wait_for_cooldown(&self) {
        let wait = {
            let cooldown = self.cooldown_until.lock().unwrap();
            cooldown.and_then(|until| until.checked_duration_since(Instant::now()))
        };

        if let Some(wait) = wait {
            tracing::debug!("Waiting {:?} for rate-limit cooldown", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Arm the cooldown `delay` from now. Never moves the deadline earlier.
    fn arm_cooldown(&self, delay: Duration) {
        let until = Instant::now() + delay;
        let mut cooldown = self.cooldown_until.lock().unwrap();
        if cooldown.map_or(true, |current| until > current) {
            *cooldown = Some(until);
        }
    }

    #[cfg(test)]
    fn cooldown_remaining(&self) -> Option<Duration> {
        let cooldown = self.cooldown_until.lock().unwrap();
        cooldown.and_then(|until| until.checked_duration_since(Instant::now()))
    }
}

fn retry_after_header(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Interpret a `Retry-After` value as whole seconds. HTTP-date forms are not
/// supported and fall back to the exponential schedule.
fn parse_retry_after(header: Option<&str>) -> Option<Duration> {
    header
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Extract the provider's error message from a response body, if any.
/// Unparsable bodies yield `None`; this never fails the call by itself.
fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message)
}
