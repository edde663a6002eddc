//! Long-text summarization with a local fallback.
//!
//! [`Summarizer`] tries the remote backend when one is configured and
//! replaces any failure with [`local_summary`], so callers always get a
//! result for non-blank text.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quill_core::{Error, Note, NoteType, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::{ServiceConfig, SummaryConfig};
use crate::http::read_json;

const SENTENCE_BREAKS: &[char] = &['。', '！', '？', '\n'];
const LOCAL_TITLE_CHARS: usize = 15;
const LOCAL_KEY_POINTS: usize = 5;
const SUMMARY_TAG: &str = "总结";

/// How much of the text to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    Brief,
    Detailed,
    KeyPoints,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Detailed => "detailed",
            Self::KeyPoints => "keypoints",
        }
    }

    /// Sentences kept by the local summary.
    fn local_sentences(&self) -> usize {
        match self {
            Self::Brief => 3,
            Self::Detailed => 8,
            Self::KeyPoints => LOCAL_KEY_POINTS,
        }
    }
}

impl FromStr for SummaryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "brief" => Ok(Self::Brief),
            "detailed" => Ok(Self::Detailed),
            "keypoints" => Ok(Self::KeyPoints),
            _ => Err(Error::InvalidInput(format!("Unknown summary mode: {}", s))),
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A summary as returned by the service or built locally.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Summary {
    /// Build the note saved from a summary of `original`.
    pub fn into_note(self, original: &str, mode: SummaryMode) -> Note {
        let content = format!(
            "【原文】\n{}\n\n【总结】\n{}\n\n【要点】\n{}",
            original,
            self.summary,
            self.key_points.join("\n")
        );
        let summary_data = json!({
            "originalText": original,
            "summary": self.summary,
            "keyPoints": self.key_points,
            "mode": mode.as_str(),
            "wordCount": original.chars().count(),
            "summaryWordCount": self.summary.chars().count(),
        });

        let mut note = Note::new(self.title, content)
            .with_tag(SUMMARY_TAG)
            .with_keywords(self.tags)
            .with_kind(NoteType::Summary);
        note.summary_data = Some(summary_data);
        note
    }
}

/// Heuristic summary used when no service answers.
///
/// Sentences are split on `。！？` and newlines; brief keeps three,
/// detailed eight, key points lists the first five numbered.
pub fn local_summary(text: &str, mode: SummaryMode) -> Summary {
    let sentences: Vec<&str> = text
        .split(SENTENCE_BREAKS)
        .filter(|s| !s.trim().is_empty())
        .collect();

    let key_points: Vec<String> = sentences
        .iter()
        .take(LOCAL_KEY_POINTS)
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s.trim()))
        .collect();

    let summary = match mode {
        SummaryMode::Brief | SummaryMode::Detailed => {
            let kept: Vec<&str> = sentences
                .iter()
                .take(mode.local_sentences())
                .copied()
                .collect();
            format!("{}。", kept.join("。"))
        }
        SummaryMode::KeyPoints => key_points.join("\n"),
    };

    let head: String = text.chars().take(LOCAL_TITLE_CHARS).collect();
    Summary {
        title: format!("【总结】{}...", head),
        summary,
        key_points,
        tags: vec![SUMMARY_TAG.to_string(), "长文".to_string()],
    }
}

/// Backend for remote summarization.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn summarize(&self, text: &str, mode: SummaryMode) -> Result<Summary>;

    /// Backend name for logs.
    fn backend_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    text: &'a str,
    mode: SummaryMode,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    summary: Summary,
}

/// JSON summarization endpoint: `POST {url}` with `{text, mode}`.
pub struct HttpSummaryBackend {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpSummaryBackend {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
            timeout_secs,
        }
    }

    /// Build from configuration. None when no URL is configured.
    pub fn from_config(config: &SummaryConfig) -> Option<Self> {
        let url = config.url.clone()?;
        Some(Self::new(url, config.api_key.clone(), config.timeout_secs))
    }

    /// Create from environment variables.
    /// Returns None if the summary URL is not set.
    pub fn from_env() -> Option<Self> {
        Self::from_config(&ServiceConfig::from_env().summary)
    }
}

#[async_trait]
impl SummaryBackend for HttpSummaryBackend {
    async fn summarize(&self, text: &str, mode: SummaryMode) -> Result<Summary> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&SummaryRequest { text, mode })
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Request(format!("Summary request failed: {}", e)))?;
        let body: SummaryResponse = read_json(response, "Summary service").await?;

        if !body.success {
            return Err(Error::service(
                body.error.unwrap_or_else(|| "Summary failed".to_string()),
            ));
        }
        Ok(body.summary)
    }

    fn backend_name(&self) -> &str {
        "http_summary"
    }
}

/// Remote summarization with local fallback.
#[derive(Clone, Default)]
pub struct Summarizer {
    backend: Option<Arc<dyn SummaryBackend>>,
}

impl Summarizer {
    pub fn new(backend: Option<Arc<dyn SummaryBackend>>) -> Self {
        Self { backend }
    }

    /// Summarizer that never calls out.
    pub fn local_only() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SummaryConfig) -> Self {
        let backend = HttpSummaryBackend::from_config(config)
            .map(|b| Arc::new(b) as Arc<dyn SummaryBackend>);
        Self::new(backend)
    }

    /// Summarize `text`. Only blank input is an error; every remote
    /// failure is replaced by the local summary.
    pub async fn summarize(&self, text: &str, mode: SummaryMode) -> Result<Summary> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("Text to summarize is empty".to_string()));
        }

        let Some(backend) = &self.backend else {
            debug!(
                subsystem = "inference",
                component = "summarizer",
                %mode,
                fallback = true,
                "No summary backend, using local summary"
            );
            return Ok(local_summary(text, mode));
        };

        match backend.summarize(text, mode).await {
            Ok(summary) => {
                debug!(
                    subsystem = "inference",
                    component = "summarizer",
                    backend = backend.backend_name(),
                    %mode,
                    fallback = false,
                    "Summary complete"
                );
                Ok(summary)
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "summarizer",
                    backend = backend.backend_name(),
                    %mode,
                    error = %e,
                    fallback = true,
                    "Summary service failed, using local summary"
                );
                Ok(local_summary(text, mode))
            }
        }
    }
}
