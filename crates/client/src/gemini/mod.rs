//! Gemini summary producer.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST {base_url}/models/{model}:generateContent`
//! - **Auth**: `x-goog-api-key` header. The key never appears in the URL, so
//!   transport errors cannot echo it.
//! - **Body**: one user part carrying the prompt, plus `generationConfig`
//!   (temperature 0.3, topK 32, topP 1, maxOutputTokens 1024).
//! - **Errors**: 401/403 are auth failures, 429 is rate limiting, any other
//!   non-2xx reports the API's `error.message`. A response without candidate
//!   text is an error. Nothing is retried.

pub mod error;
pub mod request;
pub mod response;

pub use error::GeminiError;
pub use request::{GenerateRequest, GenerationConfig};
pub use response::GenerateResponse;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use sumlify_core::{AppConfig, Error};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that can turn a prompt into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, Error>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub generation: GenerationConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("sumlify/", env!("CARGO_PKG_VERSION")).to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

impl From<&AppConfig> for GeminiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.gemini_api_key.clone().unwrap_or_default(),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            generation: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url.trim_end_matches('/'), self.config.model)
    }

    /// Send one `generateContent` call and return the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let start = Instant::now();
        let body = GenerateRequest::from_prompt(prompt, self.config.generation);

        tracing::debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "requesting summary");

        let http_response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_response.status();
        let bytes = http_response.bytes().await?;
        tracing::debug!(status = status.as_u16(), elapsed_ms = start.elapsed().as_millis() as u64, "Gemini responded");

        if !status.is_success() {
            let message = response::error_message(&bytes);
            return Err(match status.as_u16() {
                401 | 403 => GeminiError::AuthError(message),
                429 => GeminiError::RateLimited(message),
                code => GeminiError::HttpError { status: code, message },
            });
        }

        let parsed: GenerateResponse = serde_json::from_slice(&bytes).map_err(|e| GeminiError::Parse(e.to_string()))?;
        parsed
            .first_text()
            .map(str::to_string)
            .ok_or(GeminiError::EmptyResponse)
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> Result<String, Error> {
        self.generate(prompt).await.map_err(|e| {
            tracing::warn!(error = %e, "summary generation failed");
            Error::from(e)
        })
    }
}
