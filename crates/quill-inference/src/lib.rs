//! # quill-inference
//!
//! Remote recognition and enrichment services for quill.
//!
//! This crate provides:
//! - Pluggable backend traits for OCR, speech, summaries and documents
//! - Baidu OCR and short-speech backends with a shared access-token cache
//! - JSON summary and document-enhancement backends
//! - A local summary fallback used whenever the summary service fails
//! - Builders turning summaries and enhanced documents into notes
//! - [`ServiceReply`], the `{success, text, error}` reply shape
//!
//! # Example
//!
//! ```rust,no_run
//! use quill_inference::{BaiduSpeechBackend, Dialect, ServiceReply, SpeechBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = BaiduSpeechBackend::from_env().expect("speech not configured");
//!     let audio = std::fs::read("memo.mp3").unwrap();
//!     let reply = ServiceReply::from(backend.transcribe(&audio, Dialect::Cantonese).await);
//!     println!("{}", serde_json::to_string(&reply).unwrap());
//! }
//! ```

pub mod config;
pub mod document;
mod http;
pub mod ocr;
pub mod reply;
pub mod speech;
pub mod summary;
pub mod token;

pub use config::{
    ConfigError, ConfigResult, DocumentConfig, OcrConfig, ServiceConfig, SpeechConfig,
    SummaryConfig,
};
pub use document::{
    check_document_size, DocumentBackend, DocumentKind, DocumentRequest, EnhancedDocument,
    Enhancement, HttpDocumentBackend,
};
pub use ocr::{BaiduOcrBackend, OcrBackend, OcrMode, DEFAULT_OCR_LANGUAGE};
pub use reply::ServiceReply;
pub use speech::{BaiduSpeechBackend, Dialect, SpeechBackend, SPEECH_FORMAT};
pub use summary::{
    local_summary, HttpSummaryBackend, Summarizer, Summary, SummaryBackend, SummaryMode,
};
pub use token::AccessTokenProvider;
