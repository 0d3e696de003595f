//! Document and chunk types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// MIME type of PDF files
pub const MIME_PDF: &str = "application/pdf";
/// MIME type of Word documents (.docx)
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type of legacy Word documents (.doc)
pub const MIME_DOC: &str = "application/msword";
/// MIME type of plain text
pub const MIME_TEXT: &str = "text/plain";

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx, .doc)
    Docx,
    /// Plain text file
    Txt,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" | "doc" => Self::Docx,
            "txt" | "text" => Self::Txt,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a MIME type; parameters such as `charset` are ignored
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            MIME_PDF => Self::Pdf,
            MIME_DOCX | MIME_DOC => Self::Docx,
            MIME_TEXT => Self::Txt,
            _ => Self::Unknown,
        }
    }

    /// Canonical MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => MIME_PDF,
            Self::Docx => MIME_DOCX,
            Self::Txt => MIME_TEXT,
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document",
            Self::Txt => "Text File",
            Self::Unknown => "Unknown",
        }
    }
}

/// Metadata of the uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename as uploaded by user
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// MIME type the extractor was invoked with
    pub mime_type: String,
    /// SHA-256 of the extracted text
    pub content_hash: String,
    /// File size in bytes
    pub file_size: u64,
    /// Extracted text length in characters
    pub text_length: usize,
    /// Total number of chunks created
    pub total_chunks: u32,
    /// Total number of pages (PDF only)
    pub total_pages: Option<u32>,
    /// Chunks were built from placeholder text because extraction failed
    #[serde(default)]
    pub extraction_failed: bool,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(filename: String, file_type: FileType, mime_type: String, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            file_type,
            mime_type,
            content_hash: String::new(),
            file_size,
            text_length: 0,
            total_chunks: 0,
            total_pages: None,
            extraction_failed: false,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// A chunk of text from the document, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Identifier derived from the chunk index
    pub id: String,
    /// Trimmed, non-empty text content
    pub content: String,
    /// Zero-based position in the document
    pub chunk_index: u32,
    /// Number of space-separated words
    pub word_count: u32,
    /// Page number (1-indexed) when the source format has pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

impl Chunk {
    /// Create a chunk; `content` is expected to be trimmed already
    pub fn new(chunk_index: u32, content: String) -> Self {
        let word_count = content.split(' ').filter(|w| !w.is_empty()).count() as u32;
        Self {
            id: format!("chunk-{}", chunk_index),
            content,
            chunk_index,
            word_count,
            page_number: None,
        }
    }

    /// Length of the content in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("doc"), FileType::Docx);
        assert_eq!(FileType::from_extension("xlsx"), FileType::Unknown);

        assert_eq!(FileType::from_mime("application/pdf"), FileType::Pdf);
        assert_eq!(FileType::from_mime("text/plain; charset=utf-8"), FileType::Txt);
        assert_eq!(FileType::from_mime(MIME_DOC), FileType::Docx);
        assert_eq!(FileType::from_mime("image/png"), FileType::Unknown);
        assert!(!FileType::Unknown.is_supported());
    }

    #[test]
    fn test_chunk_new() {
        let chunk = Chunk::new(3, "Привет мир. Hello world.".to_string());
        assert_eq!(chunk.id, "chunk-3");
        assert_eq!(chunk.word_count, 4);
        assert_eq!(chunk.char_len(), 24);
        assert!(chunk.page_number.is_none());
    }
}
