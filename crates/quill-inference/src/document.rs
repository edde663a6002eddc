//! Document enhancement: text extraction plus an AI-written digest.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use quill_core::defaults::{DEFAULT_DOCUMENT_CATEGORY, DOCUMENT_MAX_BYTES};
use quill_core::{Error, Note, NoteType, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::{DocumentConfig, ServiceConfig};
use crate::http::read_json;

/// File kind, judged by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    #[serde(rename = "doc")]
    Word,
    #[serde(rename = "txt")]
    Text,
    #[default]
    Unknown,
}

impl DocumentKind {
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Word,
            "txt" => Self::Text,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "doc",
            Self::Text => "txt",
            Self::Unknown => "unknown",
        }
    }
}

/// Reject empty files and files over `max_bytes`.
pub fn check_document_size(len: u64, max_bytes: u64) -> Result<()> {
    if len == 0 {
        return Err(Error::InvalidInput("Document is empty".to_string()));
    }
    if len > max_bytes {
        return Err(Error::InvalidInput(format!(
            "Document is {} bytes, limit is {} bytes",
            len, max_bytes
        )));
    }
    Ok(())
}

/// A file to enhance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl DocumentRequest {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            kind: DocumentKind::from_file_name(&file_name),
            file_name,
            bytes,
        }
    }
}

/// The AI-written part of an enhanced document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enhancement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Extracted text and digest for one file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnhancedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub extracted_text: String,
    pub enhancement: Enhancement,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn write_numbered(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(heading);
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, item);
    }
    out.push('\n');
}

impl EnhancedDocument {
    /// Note body: file name, then summary, key points, questions and the
    /// original text, each only when present.
    pub fn format_content(&self) -> String {
        let mut out = format!("📄 文档名称：{}\n\n", self.file_name);

        if let Some(summary) = non_blank(&self.enhancement.summary) {
            let _ = write!(out, "📝 内容摘要：\n{}\n\n", summary);
        }
        write_numbered(&mut out, "💡 核心要点：\n", &self.enhancement.key_points);
        write_numbered(&mut out, "❓ 思考问题：\n", &self.enhancement.questions);
        if !self.extracted_text.is_empty() {
            let _ = write!(out, "📖 原文内容：\n{}", self.extracted_text);
        }
        out
    }

    /// Build the document note, ready to save.
    pub fn into_note(self) -> Note {
        let content = self.format_content();
        let title = non_blank(&self.enhancement.title)
            .map(str::to_string)
            .unwrap_or_else(|| format!("【文档】{}", self.file_name));
        let tag = non_blank(&self.enhancement.category)
            .unwrap_or(DEFAULT_DOCUMENT_CATEGORY)
            .to_string();
        let document_data = json!({
            "fileName": self.file_name,
            "fileType": self.kind.as_str(),
            "summary": self.enhancement.summary,
            "keyPoints": self.enhancement.key_points,
            "questions": self.enhancement.questions,
        });

        let mut note = Note::new(title, content)
            .with_tag(tag)
            .with_keywords(self.enhancement.keywords)
            .with_kind(NoteType::Document);
        note.document_data = Some(document_data);
        note
    }
}

/// Backend that extracts and enhances documents.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn enhance(&self, request: &DocumentRequest) -> Result<EnhancedDocument>;

    /// Backend name for logs.
    fn backend_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceRequest<'a> {
    file_name: &'a str,
    file_type: DocumentKind,
    content: String,
}

#[derive(Debug, Deserialize)]
struct EnhanceResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    text: String,
    #[serde(default)]
    enhanced: Option<Enhancement>,
    #[serde(default)]
    error: Option<String>,
}

/// JSON enhancement endpoint: `POST {url}` with the base64 file.
pub struct HttpDocumentBackend {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout_secs: u64,
    max_bytes: u64,
}

impl HttpDocumentBackend {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
            timeout_secs,
            max_bytes: DOCUMENT_MAX_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Build from configuration. None when no URL is configured.
    pub fn from_config(config: &DocumentConfig) -> Option<Self> {
        let url = config.url.clone()?;
        Some(
            Self::new(url, config.api_key.clone(), config.timeout_secs)
                .with_max_bytes(config.max_bytes),
        )
    }

    /// Create from environment variables.
    /// Returns None if the document URL is not set.
    pub fn from_env() -> Option<Self> {
        Self::from_config(&ServiceConfig::from_env().document)
    }
}

#[async_trait]
impl DocumentBackend for HttpDocumentBackend {
    async fn enhance(&self, request: &DocumentRequest) -> Result<EnhancedDocument> {
        check_document_size(request.bytes.len() as u64, self.max_bytes)?;

        let start = Instant::now();
        let body = EnhanceRequest {
            file_name: &request.file_name,
            file_type: request.kind,
            content: base64::engine::general_purpose::STANDARD.encode(&request.bytes),
        };

        let mut http = self
            .client
            .post(&self.url)
            .json(&body)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }

        let response = http
            .send()
            .await
            .map_err(|e| Error::Request(format!("Document request failed: {}", e)))?;
        let reply: EnhanceResponse = read_json(response, "Document service").await?;

        if !reply.success {
            return Err(Error::service(
                reply
                    .error
                    .unwrap_or_else(|| "Document processing failed".to_string()),
            ));
        }

        debug!(
            subsystem = "inference",
            component = "http_document",
            op = "enhance",
            file_type = request.kind.as_str(),
            payload_len = request.bytes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Document enhanced"
        );

        Ok(EnhancedDocument {
            file_name: request.file_name.clone(),
            kind: request.kind,
            extracted_text: reply.text,
            enhancement: reply.enhanced.unwrap_or_default(),
        })
    }

    fn backend_name(&self) -> &str {
        "http_document"
    }
}
