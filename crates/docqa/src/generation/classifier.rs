//! Question classification by keyword rules

use serde::{Deserialize, Serialize};

use crate::types::Chunk;

/// Kind of question a rule recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Title,
    Author,
    Abstract,
    Conclusion,
}

/// Keywords that select a response prefix.
///
/// The template may contain `{title}`, replaced with the detected title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub kind: QuestionKind,
    pub keywords: Vec<String>,
    pub template: String,
}

impl ClassificationRule {
    /// True if any keyword occurs in the (lowercased) query
    pub fn matches(&self, query_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| query_lower.contains(&keyword.to_lowercase()))
    }
}

/// Ordered rule table, first match wins
#[derive(Debug, Clone)]
pub struct QuestionClassifier {
    rules: Vec<ClassificationRule>,
}

impl QuestionClassifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// First rule matching the query, if any
    pub fn classify(&self, query: &str) -> Option<&ClassificationRule> {
        let query_lower = query.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&query_lower))
    }
}

/// Bounds for picking a title from the opening chunks
#[derive(Debug, Clone)]
pub struct TitleHeuristic {
    pub scan_chunks: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub boilerplate_markers: Vec<String>,
}

impl TitleHeuristic {
    /// First of the leading chunks that looks like a title
    pub fn detect<'a>(&self, chunks: &'a [Chunk]) -> Option<&'a Chunk> {
        chunks
            .iter()
            .take(self.scan_chunks)
            .find(|chunk| self.is_title_like(&chunk.content))
    }

    fn is_title_like(&self, content: &str) -> bool {
        let len = content.chars().count();
        if len < self.min_len || len > self.max_len {
            return false;
        }
        let lower = content.to_lowercase();
        !self
            .boilerplate_markers
            .iter()
            .any(|marker| lower.contains(&marker.to_lowercase()))
    }
}
