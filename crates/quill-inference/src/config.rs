//! Service configuration.
//!
//! Each remote service has its own section. Values come from `QUILL_*`
//! environment variables (a `.env` file is honoured by [`ServiceConfig::load`]);
//! anything unset falls back to the defaults in [`quill_core::defaults`].
//!
//! # Example
//!
//! ```rust,no_run
//! use quill_inference::config::ServiceConfig;
//!
//! let config = ServiceConfig::load().expect("invalid service configuration");
//! if config.ocr.is_configured() {
//!     // build a BaiduOcrBackend
//! }
//! ```

use quill_core::defaults::{
    ANALYSIS_TIMEOUT_SECS, BAIDU_AIP_URL, BAIDU_SPEECH_URL, DOCUMENT_MAX_BYTES,
    ENV_DOCUMENT_URL, ENV_OCR_API_KEY, ENV_OCR_BASE_URL, ENV_OCR_SECRET_KEY, ENV_SERVICE_API_KEY,
    ENV_SERVICE_TIMEOUT_SECS, ENV_SPEECH_API_KEY, ENV_SPEECH_BASE_URL, ENV_SPEECH_SECRET_KEY,
    ENV_SPEECH_TOKEN_URL, ENV_SUMMARY_URL, SERVICE_TIMEOUT_SECS, SPEECH_CUID,
};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::debug;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing configuration: {0}")]
    Missing(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn check_url(service: &str, field: &str, url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} {} cannot be empty",
            service, field
        )));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{} {} must start with http:// or https://, got: {}",
            service, field, url
        )));
    }
    Ok(())
}

fn check_credentials(
    service: &str,
    api_key: &Option<String>,
    secret_key: &Option<String>,
) -> ConfigResult<()> {
    if api_key.is_some() != secret_key.is_some() {
        return Err(ConfigError::Validation(format!(
            "{} needs both api_key and secret_key, or neither",
            service
        )));
    }
    Ok(())
}

fn check_timeout(service: &str, timeout_secs: u64) -> ConfigResult<()> {
    if timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "{} timeout_secs must be greater than 0",
            service
        )));
    }
    Ok(())
}

/// Baidu OCR (general and handwriting recognition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Base URL for both the OCR endpoints and the token endpoint.
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: BAIDU_AIP_URL.to_string(),
            api_key: None,
            secret_key: None,
            timeout_secs: SERVICE_TIMEOUT_SECS,
        }
    }
}

impl OcrConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_url("OCR", "base_url", &self.base_url)?;
        check_credentials("OCR", &self.api_key, &self.secret_key)?;
        check_timeout("OCR", self.timeout_secs)
    }
}

/// Baidu short-speech recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Recognition endpoint host.
    pub base_url: String,
    /// Host serving `/oauth/2.0/token`.
    pub token_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Device id reported to the service.
    pub cuid: String,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: BAIDU_SPEECH_URL.to_string(),
            token_url: BAIDU_AIP_URL.to_string(),
            api_key: None,
            secret_key: None,
            cuid: SPEECH_CUID.to_string(),
            timeout_secs: SERVICE_TIMEOUT_SECS,
        }
    }
}

impl SpeechConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_url("Speech", "base_url", &self.base_url)?;
        check_url("Speech", "token_url", &self.token_url)?;
        check_credentials("Speech", &self.api_key, &self.secret_key)?;
        if self.cuid.is_empty() {
            return Err(ConfigError::Validation(
                "Speech cuid cannot be empty".to_string(),
            ));
        }
        check_timeout("Speech", self.timeout_secs)
    }
}

/// Remote summarization endpoint. Without a URL only the local summary runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: ANALYSIS_TIMEOUT_SECS,
        }
    }
}

impl SummaryConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(url) = &self.url {
            check_url("Summary", "url", url)?;
        }
        check_timeout("Summary", self.timeout_secs)
    }
}

/// Remote document-enhancement endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Largest file accepted for upload.
    pub max_bytes: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: ANALYSIS_TIMEOUT_SECS,
            max_bytes: DOCUMENT_MAX_BYTES,
        }
    }
}

impl DocumentConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(url) = &self.url {
            check_url("Document", "url", url)?;
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "Document max_bytes must be greater than 0".to_string(),
            ));
        }
        check_timeout("Document", self.timeout_secs)
    }
}

/// All service sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

impl ServiceConfig {
    /// Load `.env` if present, read the environment and validate.
    pub fn load() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_env();
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from `QUILL_*` environment variables.
    ///
    /// An unparseable timeout falls back to the default.
    pub fn from_env() -> Self {
        let timeout_override = env_opt(ENV_SERVICE_TIMEOUT_SECS).and_then(|s| s.parse().ok());
        let service_api_key = env_opt(ENV_SERVICE_API_KEY);

        let ocr_defaults = OcrConfig::default();
        let ocr = OcrConfig {
            base_url: env_opt(ENV_OCR_BASE_URL).unwrap_or(ocr_defaults.base_url),
            api_key: env_opt(ENV_OCR_API_KEY),
            secret_key: env_opt(ENV_OCR_SECRET_KEY),
            timeout_secs: timeout_override.unwrap_or(ocr_defaults.timeout_secs),
        };

        let speech_defaults = SpeechConfig::default();
        let speech = SpeechConfig {
            base_url: env_opt(ENV_SPEECH_BASE_URL).unwrap_or(speech_defaults.base_url),
            token_url: env_opt(ENV_SPEECH_TOKEN_URL).unwrap_or(speech_defaults.token_url),
            api_key: env_opt(ENV_SPEECH_API_KEY),
            secret_key: env_opt(ENV_SPEECH_SECRET_KEY),
            cuid: speech_defaults.cuid,
            timeout_secs: timeout_override.unwrap_or(speech_defaults.timeout_secs),
        };

        let summary = SummaryConfig {
            url: env_opt(ENV_SUMMARY_URL),
            api_key: service_api_key.clone(),
            timeout_secs: timeout_override.unwrap_or(ANALYSIS_TIMEOUT_SECS),
        };

        let document = DocumentConfig {
            url: env_opt(ENV_DOCUMENT_URL),
            api_key: service_api_key,
            timeout_secs: timeout_override.unwrap_or(ANALYSIS_TIMEOUT_SECS),
            max_bytes: DOCUMENT_MAX_BYTES,
        };

        debug!(
            subsystem = "inference",
            component = "config",
            ocr = ocr.is_configured(),
            speech = speech.is_configured(),
            summary = summary.is_configured(),
            document = document.is_configured(),
            "Service configuration read from environment"
        );

        Self {
            ocr,
            speech,
            summary,
            document,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.ocr.validate()?;
        self.speech.validate()?;
        self.summary.validate()?;
        self.document.validate()
    }
}
