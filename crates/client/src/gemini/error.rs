//! Gemini client error types.

use std::sync::Arc;

use sumlify_core::Error;

#[derive(Debug, Clone, thiserror::Error)]
pub enum GeminiError {
    #[error("missing API key: SUMLIFY_GEMINI_API_KEY not set")]
    MissingApiKey,

    /// 401 or 403.
    #[error("authentication failed: {0}")]
    AuthError(String),

    /// 429, usually quota exhaustion.
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("API error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("request timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    #[error("parse error: {0}")]
    Parse(String),

    /// The response carried no candidate text.
    #[error("no summary received from API")]
    EmptyResponse,
}

/// The request URL is stripped so transport errors never carry endpoint details.
impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GeminiError::Timeout } else { GeminiError::Network(Arc::new(err.without_url())) }
    }
}

impl From<GeminiError> for Error {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::MissingApiKey => Error::MissingApiKey(err.to_string()),
            GeminiError::AuthError(_) => Error::GeminiAuthError(err.to_string()),
            GeminiError::RateLimited(_) => Error::GeminiRateLimited(err.to_string()),
            GeminiError::Timeout => Error::FetchTimeout(format!("summary request: {err}")),
            GeminiError::HttpError { .. }
            | GeminiError::Network(_)
            | GeminiError::Parse(_)
            | GeminiError::EmptyResponse => Error::SummaryFailed(err.to_string()),
        }
    }
}
