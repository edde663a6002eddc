//! Text recognition from images.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use quill_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{OcrConfig, ServiceConfig};
use crate::http::{read_json, trim_base};
use crate::token::AccessTokenProvider;

/// Language hint for general recognition: mixed Chinese and English.
pub const DEFAULT_OCR_LANGUAGE: &str = "CHN_ENG";

/// What kind of writing the image holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum OcrMode {
    /// Printed text, with a language hint.
    General { language: String },
    /// Handwritten text.
    Handwriting,
}

impl Default for OcrMode {
    fn default() -> Self {
        Self::general()
    }
}

impl OcrMode {
    pub fn general() -> Self {
        Self::General {
            language: DEFAULT_OCR_LANGUAGE.to_string(),
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            Self::General { .. } => "/rest/2.0/ocr/v1/general_basic",
            Self::Handwriting => "/rest/2.0/ocr/v1/handwriting",
        }
    }
}

/// Backend for recognizing text in images.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Recognize the text in an encoded image (JPEG, PNG, ...), one line
    /// per recognized block.
    async fn recognize(&self, image: &[u8], mode: &OcrMode) -> Result<String>;

    /// Backend name for logs.
    fn backend_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    words_result: Option<Vec<OcrWords>>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcrWords {
    words: String,
}

/// Baidu general / handwriting OCR.
pub struct BaiduOcrBackend {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<AccessTokenProvider>,
    timeout_secs: u64,
}

impl BaiduOcrBackend {
    /// Build from configuration. Fails when credentials are missing.
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (Some(api_key), Some(secret_key)) = (&config.api_key, &config.secret_key) else {
            return Err(Error::Config(
                "OCR api_key and secret_key are required".to_string(),
            ));
        };
        let client = reqwest::Client::new();
        let tokens = AccessTokenProvider::new(
            client.clone(),
            &config.base_url,
            api_key.clone(),
            secret_key.clone(),
            config.timeout_secs,
        );
        Ok(Self::with_token_provider(client, config, Arc::new(tokens)))
    }

    /// Build with an existing token provider (shared with other clients of
    /// the same account).
    pub fn with_token_provider(
        client: reqwest::Client,
        config: &OcrConfig,
        tokens: Arc<AccessTokenProvider>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(&config.base_url),
            tokens,
            timeout_secs: config.timeout_secs,
        }
    }

    /// Create from environment variables.
    /// Returns None if OCR credentials are not set.
    pub fn from_env() -> Option<Self> {
        let config = ServiceConfig::from_env().ocr;
        if !config.is_configured() {
            return None;
        }
        Self::new(&config).ok()
    }
}

#[async_trait]
impl OcrBackend for BaiduOcrBackend {
    async fn recognize(&self, image: &[u8], mode: &OcrMode) -> Result<String> {
        if image.is_empty() {
            return Err(Error::InvalidInput("Image is empty".to_string()));
        }

        let start = Instant::now();
        let token = self.tokens.token().await?;
        let url = format!("{}{}", self.base_url, mode.endpoint());
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image);

        let mut form: Vec<(&str, &str)> = vec![("image", image_b64.as_str())];
        if let OcrMode::General { language } = mode {
            form.push(("detect_direction", "true"));
            form.push(("language_type", language.as_str()));
        }

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", token.as_str())])
            .form(&form)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Request(format!("OCR request failed: {}", e)))?;

        let body: OcrResponse = read_json(response, "OCR API").await?;

        if let Some(code) = body.error_code {
            let message = body.error_msg.unwrap_or_else(|| "OCR failed".to_string());
            warn!(
                subsystem = "inference",
                component = "baidu_ocr",
                op = "recognize",
                code,
                error = %message,
                "OCR service reported an error"
            );
            return Err(Error::Service {
                code: Some(code),
                message,
            });
        }

        let Some(words) = body.words_result else {
            return Err(Error::service("OCR response missing words_result"));
        };

        let text = words
            .into_iter()
            .map(|w| w.words)
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            subsystem = "inference",
            component = "baidu_ocr",
            op = "recognize",
            payload_len = image.len(),
            result_len = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "OCR complete"
        );
        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "baidu_ocr"
    }
}
