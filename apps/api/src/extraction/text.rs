//! Text extraction — turns an uploaded document's bytes into one normalized text blob.
//!
//! Failures never escape this module: `extract_text` logs the error, reports it once
//! through the returned `ExtractedText`, and hands downstream extractors an empty string.

use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use zip::ZipArchive;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            DOCX_MIME => Some(DocumentFormat::Docx),
            "text/plain" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }

    /// Accepts `pdf`, `docx` and `txt` extensions, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PDF decoder panicked: {0}")]
    PdfPanic(String),

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("DOCX read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a text extraction attempt. `error` carries the single user-facing
/// message when decoding failed; `text` is empty in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub error: Option<String>,
}

/// Extracts and normalizes text. Total: any failure yields empty text plus a message.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> ExtractedText {
    match try_extract_text(bytes, format) {
        Ok(text) => {
            debug!(?format, chars = text.len(), "text extracted");
            ExtractedText { text, error: None }
        }
        Err(e) => {
            error!(?format, "Error extracting text: {e}");
            ExtractedText {
                text: String::new(),
                error: Some(format!("Error extracting text: {e}")),
            }
        }
    }
}

pub fn try_extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };
    Ok(normalize(&raw))
}

/// Text of every page in order. pdf-extract separates pages with form feeds, which
/// `normalize` turns into newlines; a page without a text layer contributes nothing.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|payload| ExtractionError::PdfPanic(panic_message(&*payload)))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Visible text of `word/document.xml`: runs concatenated, one line per paragraph.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.trim_text(false);

    let mut text = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => text.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

/// Unifies line endings, replaces non-breaking spaces and form feeds, strips trailing
/// spaces per line and trims the whole blob.
pub fn normalize(raw: &str) -> String {
    let unified = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace(['\u{a0}', '\u{2007}', '\u{202f}'], " ")
        .replace(['\u{c}', '\u{0}'], "\n");

    unified
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
