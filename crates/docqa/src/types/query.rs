//! Request types

use serde::{Deserialize, Serialize};

/// Chat request
///
/// With `document` set, the text is chunked for this request only and the
/// session is left untouched; otherwise the uploaded document is queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question to answer
    #[serde(alias = "message")]
    pub query: String,

    /// Inline document text (stateless mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

impl ChatRequest {
    /// Create a new session query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            document: None,
        }
    }

    /// Query the given text instead of the session document
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }
}

/// JSON upload with base64 file content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Base64-encoded file bytes
    pub file_data: String,
    /// Original filename
    pub file_name: String,
    /// Declared MIME type; guessed from the filename when absent
    #[serde(default)]
    pub file_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_alias() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "What is the title?", "document": "Text."}"#)
                .unwrap();
        assert_eq!(request.query, "What is the title?");
        assert_eq!(request.document.as_deref(), Some("Text."));

        let request: ChatRequest = serde_json::from_str(r#"{"query": "author"}"#).unwrap();
        assert!(request.document.is_none());
    }
}
