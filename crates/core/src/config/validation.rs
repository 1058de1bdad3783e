//! Checks applied to `AppConfig` after loading.

use crate::config::AppConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

/// Shape check for a Gemini API key: more than 20 characters and containing `AIza`.
pub fn is_valid_api_key(key: &str) -> bool {
    let key = key.trim();
    key.len() > 20 && key.contains("AIza")
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for out-of-range sizes or timeouts, an
    /// empty user agent or model, a zero sweep interval, or an API key that
    /// does not look like a Gemini key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.gemini_model.trim().is_empty() {
            return Err(invalid("gemini_model", "must not be empty"));
        }

        if self.max_prompt_chars == 0 {
            return Err(invalid("max_prompt_chars", "must be greater than 0"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(invalid("sweep_interval_secs", "must be greater than 0"));
        }

        if let Some(key) = &self.gemini_api_key
            && !is_valid_api_key(key)
        {
            return Err(invalid("gemini_api_key", "does not look like a Gemini API key"));
        }

        Ok(())
    }
}
