//! Speech-to-text for short voice notes.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use quill_core::defaults::SPEECH_SAMPLE_RATE;
use quill_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ServiceConfig, SpeechConfig};
use crate::http::{read_json, trim_base};
use crate::token::AccessTokenProvider;

/// Audio container the recorder produces.
pub const SPEECH_FORMAT: &str = "mp3";

/// Spoken variety, selecting the recognition model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Mandarin,
    Cantonese,
    Sichuan,
    Henan,
    Dongbei,
    Shanghainese,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Self::Mandarin,
        Self::Cantonese,
        Self::Sichuan,
        Self::Henan,
        Self::Dongbei,
        Self::Shanghainese,
    ];

    /// Recognition model id (`dev_pid`).
    ///
    /// Shanghainese has no model of its own and uses the Sichuanese one.
    pub fn dev_pid(&self) -> u32 {
        match self {
            Self::Mandarin => 1537,
            Self::Cantonese => 1637,
            Self::Sichuan => 1837,
            Self::Henan => 1936,
            Self::Dongbei => 1946,
            Self::Shanghainese => 1837,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mandarin => "mandarin",
            Self::Cantonese => "cantonese",
            Self::Sichuan => "sichuan",
            Self::Henan => "henan",
            Self::Dongbei => "dongbei",
            Self::Shanghainese => "shanghainese",
        }
    }

    /// Parse a dialect code, falling back to Mandarin for unknown codes.
    pub fn from_code_lossy(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s.to_lowercase())
            .ok_or_else(|| Error::InvalidInput(format!("Unknown dialect: {}", s)))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend for transcribing recorded speech.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Transcribe an audio clip spoken in `dialect`.
    async fn transcribe(&self, audio: &[u8], dialect: Dialect) -> Result<String>;

    /// Backend name for logs.
    fn backend_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    format: &'a str,
    rate: u32,
    channel: u32,
    token: &'a str,
    cuid: &'a str,
    dev_pid: u32,
    len: usize,
    speech: String,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    #[serde(default)]
    err_no: i64,
    #[serde(default)]
    err_msg: Option<String>,
    #[serde(default)]
    result: Vec<String>,
}

/// Baidu short-speech recognition (`/server_api`).
pub struct BaiduSpeechBackend {
    client: reqwest::Client,
    base_url: String,
    cuid: String,
    tokens: Arc<AccessTokenProvider>,
    timeout_secs: u64,
}

impl BaiduSpeechBackend {
    /// Build from configuration. Fails when credentials are missing.
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let (Some(api_key), Some(secret_key)) = (&config.api_key, &config.secret_key) else {
            return Err(Error::Config(
                "Speech api_key and secret_key are required".to_string(),
            ));
        };
        let client = reqwest::Client::new();
        let tokens = Arc::new(AccessTokenProvider::new(
            client.clone(),
            &config.token_url,
            api_key.clone(),
            secret_key.clone(),
            config.timeout_secs,
        ));
        Ok(Self {
            client,
            base_url: trim_base(&config.base_url),
            cuid: config.cuid.clone(),
            tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Create from environment variables.
    /// Returns None if speech credentials are not set.
    pub fn from_env() -> Option<Self> {
        let config = ServiceConfig::from_env().speech;
        if !config.is_configured() {
            return None;
        }
        Self::new(&config).ok()
    }
}

#[async_trait]
impl SpeechBackend for BaiduSpeechBackend {
    async fn transcribe(&self, audio: &[u8], dialect: Dialect) -> Result<String> {
        if audio.is_empty() {
            return Err(Error::InvalidInput("Audio is empty".to_string()));
        }

        let start = Instant::now();
        let token = self.tokens.token().await?;
        let request = SpeechRequest {
            format: SPEECH_FORMAT,
            rate: SPEECH_SAMPLE_RATE,
            channel: 1,
            token: &token,
            cuid: &self.cuid,
            dev_pid: dialect.dev_pid(),
            len: audio.len(),
            speech: base64::engine::general_purpose::STANDARD.encode(audio),
        };

        let response = self
            .client
            .post(format!("{}/server_api", self.base_url))
            .json(&request)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Speech request failed: {}", e)))?;

        let body: SpeechResponse = read_json(response, "Speech API").await?;

        if body.err_no != 0 || body.result.is_empty() {
            let message = body
                .err_msg
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Recognition failed".to_string());
            warn!(
                subsystem = "inference",
                component = "baidu_speech",
                op = "transcribe",
                dialect = %dialect,
                code = body.err_no,
                error = %message,
                "Speech recognition failed"
            );
            return Err(Error::Service {
                code: Some(body.err_no),
                message,
            });
        }

        debug!(
            subsystem = "inference",
            component = "baidu_speech",
            op = "transcribe",
            dialect = %dialect,
            payload_len = audio.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Transcription complete"
        );
        Ok(body.result.into_iter().next().unwrap_or_default())
    }

    fn backend_name(&self) -> &str {
        "baidu_speech"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_dev_pid_table() {
        assert_eq!(Dialect::Mandarin.dev_pid(), 1537);
        assert_eq!(Dialect::Cantonese.dev_pid(), 1637);
        assert_eq!(Dialect::Sichuan.dev_pid(), 1837);
        assert_eq!(Dialect::Henan.dev_pid(), 1936);
        assert_eq!(Dialect::Dongbei.dev_pid(), 1946);
        assert_eq!(Dialect::Shanghainese.dev_pid(), 1837);
    }

    #[test]
    fn test_dialect_parse() {
        assert_eq!("cantonese".parse::<Dialect>().unwrap(), Dialect::Cantonese);
        assert_eq!("Dongbei".parse::<Dialect>().unwrap(), Dialect::Dongbei);
        assert!("klingon".parse::<Dialect>().is_err());
        assert_eq!(Dialect::from_code_lossy("klingon"), Dialect::Mandarin);
        for d in Dialect::ALL {
            assert_eq!(d.to_string().parse::<Dialect>().unwrap(), d);
        }
    }

    #[test]
    fn test_dialect_serde() {
        assert_eq!(
            serde_json::to_value(Dialect::Shanghainese).unwrap(),
            serde_json::json!("shanghainese")
        );
    }

    async fn server() -> (MockServer, BaiduSpeechBackend) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;
        let backend = BaiduSpeechBackend::new(&SpeechConfig {
            base_url: server.uri(),
            token_url: server.uri(),
            api_key: Some("ak".into()),
            secret_key: Some("sk".into()),
            cuid: "test-device".into(),
            timeout_secs: 5,
        })
        .unwrap();
        (server, backend)
    }

    #[tokio::test]
    async fn test_transcribe_sends_expected_request() {
        let (server, backend) = server().await;
        Mock::given(method("POST"))
            .and(path("/server_api"))
            .and(body_partial_json(serde_json::json!({
                "format": "mp3",
                "rate": 16000,
                "channel": 1,
                "token": "tok",
                "cuid": "test-device",
                "dev_pid": 1637,
                "len": 3,
                "speech": "YWJj"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "err_no": 0,
                "err_msg": "success.",
                "result": ["今日天气好", "今日天气"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = backend.transcribe(b"abc", Dialect::Cantonese).await.unwrap();
        assert_eq!(text, "今日天气好");
    }

    #[tokio::test]
    async fn test_err_no_maps_to_service_error() {
        let (server, backend) = server().await;
        Mock::given(method("POST"))
            .and(path("/server_api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "err_no": 3301,
                "err_msg": "speech quality error."
            })))
            .mount(&server)
            .await;

        let err = backend.transcribe(b"abc", Dialect::Mandarin).await.unwrap_err();
        assert_eq!(err.service_code(), Some(3301));
        assert!(err.to_string().contains("speech quality error"));
    }

    #[tokio::test]
    async fn test_empty_result_is_failure() {
        let (server, backend) = server().await;
        Mock::given(method("POST"))
            .and(path("/server_api"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"err_no": 0})),
            )
            .mount(&server)
            .await;

        let err = backend.transcribe(b"abc", Dialect::Mandarin).await.unwrap_err();
        assert_eq!(err.to_string(), "Service error: Recognition failed");
    }

    #[tokio::test]
    async fn test_empty_audio_rejected() {
        let (_server, backend) = server().await;
        assert!(matches!(
            backend.transcribe(b"", Dialect::Mandarin).await,
            Err(Error::InvalidInput(_))
        ));
    }
}
