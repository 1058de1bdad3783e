//! Unified error types for sumlify.
//!
//! Every variant renders as `CODE: detail` so tool callers can match on the prefix.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the sumlify server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Content extraction failed.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// The page does not carry enough text to summarize.
    #[error("INSUFFICIENT_CONTENT: {0}")]
    InsufficientContent(String),

    /// No cache entry found for the given key.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be encoded or decoded.
    #[error("CACHE_ERROR: invalid stored value: {0}")]
    Codec(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response while fetching a page.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// No Gemini API key configured.
    #[error("MISSING_API_KEY: {0}")]
    MissingApiKey(String),

    /// Gemini rejected the API key.
    #[error("GEMINI_AUTH_ERROR: {0}")]
    GeminiAuthError(String),

    /// Gemini rate limited or out of quota.
    #[error("GEMINI_RATE_LIMITED: {0}")]
    GeminiRateLimited(String),

    /// Summary generation failed for any other reason.
    #[error("SUMMARY_FAILED: {0}")]
    SummaryFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

impl Error {
    /// JSON-RPC error code reported to MCP clients.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => -32602,
            Error::ExtractFailed(_) => -32000,
            Error::CacheMiss(_) => -32001,
            Error::Database(_) | Error::MigrationFailed(_) | Error::Codec(_) => -32002,
            Error::InvalidUrl(_) => -32003,
            Error::InsufficientContent(_) => -32004,
            Error::FetchTimeout(_) => -32006,
            Error::FetchTooLarge(_) => -32007,
            Error::HttpError(_) => -32008,
            Error::MissingApiKey(_) => -32009,
            Error::GeminiAuthError(_) => -32010,
            Error::GeminiRateLimited(_) => -32011,
            Error::SummaryFailed(_) => -32012,
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = err.code();
        let message = match err {
            Error::InvalidInput(msg)
            | Error::ExtractFailed(msg)
            | Error::InsufficientContent(msg)
            | Error::CacheMiss(msg)
            | Error::MigrationFailed(msg)
            | Error::Codec(msg)
            | Error::InvalidUrl(msg)
            | Error::FetchTimeout(msg)
            | Error::FetchTooLarge(msg)
            | Error::HttpError(msg)
            | Error::MissingApiKey(msg)
            | Error::GeminiAuthError(msg)
            | Error::GeminiRateLimited(msg)
            | Error::SummaryFailed(msg) => msg,
            Error::Database(e) => e.to_string(),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
