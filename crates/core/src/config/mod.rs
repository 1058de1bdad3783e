//! Application configuration.
//!
//! Loaded with figment from, lowest to highest precedence: built-in defaults,
//! the TOML file named by `SUMLIFY_CONFIG_FILE`, and `SUMLIFY_*` environment
//! variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, is_valid_api_key};

pub const ENV_PREFIX: &str = "SUMLIFY_";
pub const CONFIG_FILE_ENV: &str = "SUMLIFY_CONFIG_FILE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API key (`SUMLIFY_GEMINI_API_KEY`). Only summarization needs it.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// API root the model path is appended to.
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// SQLite file backing the cache and settings.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum page body size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Timeout for page fetches and model calls, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Page text is cut to this many characters before prompting.
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Pages with less extracted text than this are refused.
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default = "default_sweep_initial_delay_secs")]
    pub sweep_initial_delay_secs: u64,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./sumlify-cache.sqlite")
}

fn default_user_agent() -> String {
    concat!("sumlify/", env!("CARGO_PKG_VERSION")).into()
}

fn default_max_bytes() -> usize {
    5_242_880
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_prompt_chars() -> usize {
    8_000
}

fn default_min_content_chars() -> usize {
    100
}

fn default_sweep_interval_secs() -> u64 {
    3_600
}

fn default_sweep_initial_delay_secs() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_base_url: default_gemini_base_url(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_prompt_chars: default_max_prompt_chars(),
            min_content_chars: default_min_content_chars(),
            sweep_interval_secs: default_sweep_interval_secs(),
            sweep_initial_delay_secs: default_sweep_initial_delay_secs(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn sweep_initial_delay(&self) -> Duration {
        Duration::from_secs(self.sweep_initial_delay_secs)
    }

    /// Load and validate configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or parsed, or if
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var(CONFIG_FILE_ENV) {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;

        tracing::debug!(
            db_path = %config.db_path.display(),
            model = %config.gemini_model,
            has_api_key = config.gemini_api_key.is_some(),
            "configuration loaded"
        );

        Ok(config)
    }

    /// The Gemini API key, checked only when a summary is requested.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no key is configured.
    pub fn require_gemini_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "gemini_api_key".into(),
                hint: "set SUMLIFY_GEMINI_API_KEY".into(),
            })
    }
}
