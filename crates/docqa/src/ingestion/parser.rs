//! Text extraction from uploaded files

use encoding_rs::WINDOWS_1251;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::FileType;

/// Text extracted from one file
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// File type the extractor used
    pub file_type: FileType,
    /// Resolved MIME type
    pub mime_type: String,
    /// Extracted text, trimmed
    pub text: String,
    /// SHA-256 of `text`
    pub content_hash: String,
    /// Page count (PDF only)
    pub total_pages: Option<u32>,
}

/// Turns raw file bytes into a single text blob
pub trait Extractor: Send + Sync {
    /// Extract text from `data`.
    ///
    /// `mime_type` is the declared content type; when absent or unknown the
    /// type is guessed from `filename`.
    fn extract(&self, filename: &str, data: &[u8], mime_type: Option<&str>) -> Result<ExtractedText>;
}

/// Text shown in place of a document whose extraction failed
pub fn extraction_placeholder(filename: &str, error: &Error) -> String {
    let reason = match error {
        Error::Extraction { message, .. } => message.clone(),
        other => other.to_string(),
    };
    format!("[Could not extract text from '{}': {}]", filename, reason)
}

/// PDF, Word and plain text extractor
#[derive(Debug, Clone)]
pub struct FileExtractor {
    max_size: usize,
}

impl FileExtractor {
    /// Create an extractor rejecting files above `max_size` bytes
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    /// Resolve the file type from the declared MIME type, then the filename
    pub fn resolve_type(filename: &str, mime_type: Option<&str>) -> (FileType, String) {
        if let Some(mime) = mime_type {
            let file_type = FileType::from_mime(mime);
            if file_type.is_supported() {
                return (file_type, file_type.mime_type().to_string());
            }
        }

        if let Some(guess) = mime_guess::from_path(filename).first() {
            let file_type = FileType::from_mime(guess.essence_str());
            if file_type.is_supported() {
                return (file_type, file_type.mime_type().to_string());
            }
        }

        let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        let file_type = FileType::from_extension(extension);
        let mime = mime_type
            .map(str::to_string)
            .unwrap_or_else(|| file_type.mime_type().to_string());
        (file_type, mime)
    }

    fn extract_pdf(filename: &str, data: &[u8]) -> Result<(String, Option<u32>)> {
        let raw = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(filename, format!("Error extracting text from PDF: {}", e)))?;

        let text = raw
            .replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let total_pages = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        Ok((text, total_pages))
    }

    fn extract_docx(filename: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data).map_err(|e| {
            Error::extraction(filename, format!("Error extracting text from Word document: {}", e))
        })?;

        let mut paragraphs = String::new();
        let mut tables = String::new();

        for child in &doc.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => {
                    let text = paragraph_text(p);
                    if !text.trim().is_empty() {
                        paragraphs.push_str(&text);
                        paragraphs.push('\n');
                    }
                }
                docx_rs::DocumentChild::Table(table) => {
                    for row in &table.rows {
                        let docx_rs::TableChild::TableRow(row) = row;
                        for cell in &row.cells {
                            let docx_rs::TableRowChild::TableCell(cell) = cell;
                            let text = cell
                                .children
                                .iter()
                                .filter_map(|content| match content {
                                    docx_rs::TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                                    _ => None,
                                })
                                .collect::<Vec<_>>()
                                .join(" ");
                            if !text.trim().is_empty() {
                                tables.push_str(&text);
                                tables.push(' ');
                            }
                        }
                        tables.push('\n');
                    }
                }
                _ => {}
            }
        }

        paragraphs.push_str(&tables);
        Ok(paragraphs)
    }

    /// UTF-8, then Windows-1251, then Latin-1 if the Cyrillic decoder rejects a byte
    fn extract_txt(data: &[u8]) -> String {
        if let Ok(text) = std::str::from_utf8(data) {
            return text.to_string();
        }
        match WINDOWS_1251.decode_without_bom_handling_and_without_replacement(data) {
            Some(text) => text.into_owned(),
            None => encoding_rs::mem::decode_latin1(data).into_owned(),
        }
    }
}

impl Extractor for FileExtractor {
    fn extract(&self, filename: &str, data: &[u8], mime_type: Option<&str>) -> Result<ExtractedText> {
        if data.len() > self.max_size {
            return Err(Error::FileTooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let (file_type, mime_type) = Self::resolve_type(filename, mime_type);

        let (text, total_pages) = match file_type {
            FileType::Pdf => Self::extract_pdf(filename, data)?,
            FileType::Docx => (Self::extract_docx(filename, data)?, None),
            FileType::Txt => (Self::extract_txt(data), None),
            FileType::Unknown => return Err(Error::UnsupportedFileType(mime_type)),
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::extraction(filename, "No text could be extracted from the file"));
        }

        tracing::debug!(
            "Extracted {} chars from {} ({})",
            text.chars().count(),
            filename,
            file_type.display_name()
        );

        Ok(ExtractedText {
            file_type,
            mime_type,
            content_hash: hash_content(&text),
            text,
            total_pages,
        })
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for child in &run.children {
                if let docx_rs::RunChild::Text(t) = child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

/// SHA-256 of text, hex encoded
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
