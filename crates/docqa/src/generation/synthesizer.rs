//! Local answer synthesis from ranked chunks

use crate::config::SynthesisConfig;
use crate::types::{Chunk, ScoredChunk};

use super::classifier::{QuestionClassifier, QuestionKind, TitleHeuristic};

/// Builds a response from ranked chunks without a language model.
///
/// The response is a prefix chosen by question type, a body made of the best
/// chunks, and a statistics footer. Synthesis never fails.
#[derive(Debug, Clone)]
pub struct AnswerSynthesizer {
    classifier: QuestionClassifier,
    title: TitleHeuristic,
    high_confidence_threshold: f32,
    max_body_chunks: usize,
    generic_template: String,
}

impl Default for AnswerSynthesizer {
    fn default() -> Self {
        Self::new(&SynthesisConfig::default())
    }
}

impl AnswerSynthesizer {
    pub fn new(config: &SynthesisConfig) -> Self {
        Self {
            classifier: QuestionClassifier::new(config.rules.clone()),
            title: TitleHeuristic {
                scan_chunks: config.title_scan_chunks,
                min_len: config.title_min_len,
                max_len: config.title_max_len,
                boilerplate_markers: config.boilerplate_markers.clone(),
            },
            high_confidence_threshold: config.high_confidence_threshold,
            max_body_chunks: config.max_body_chunks,
            generic_template: config.generic_template.clone(),
        }
    }

    /// Compose the response for `query`.
    ///
    /// `ranked` is the scorer's output (best first), `doc_chunks` the whole
    /// chunk set of the document.
    pub fn synthesize(
        &self,
        query: &str,
        ranked: &[ScoredChunk],
        doc_chunks: &[Chunk],
        filename: Option<&str>,
    ) -> String {
        let Some(top) = ranked.first() else {
            return no_results_message(query, filename, doc_chunks.len());
        };

        let mut response = self.prefix(query, top, doc_chunks);
        response.push_str(&self.body(ranked));
        response.push_str(&footer(ranked.len(), top.score, doc_chunks.len()));
        response
    }

    fn prefix(&self, query: &str, top: &ScoredChunk, doc_chunks: &[Chunk]) -> String {
        match self.classifier.classify(query) {
            Some(rule) if rule.kind == QuestionKind::Title => {
                let title = self
                    .title
                    .detect(doc_chunks)
                    .map(|chunk| chunk.content.as_str())
                    .unwrap_or(top.content.as_str());
                rule.template.replace("{title}", title)
            }
            Some(rule) => rule.template.clone(),
            None => self.generic_template.clone(),
        }
    }

    fn body(&self, ranked: &[ScoredChunk]) -> String {
        let confident: Vec<&ScoredChunk> = ranked
            .iter()
            .filter(|chunk| chunk.score > self.high_confidence_threshold)
            .take(self.max_body_chunks)
            .collect();

        if confident.len() < 2 {
            return ranked[0].content.clone();
        }

        confident
            .iter()
            .enumerate()
            .map(|(i, chunk)| format!("{}. {}", i + 1, chunk.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn document_label(filename: Option<&str>) -> String {
    match filename {
        Some(name) => format!("the document \"{}\"", name),
        None => "the document".to_string(),
    }
}

fn no_results_message(query: &str, filename: Option<&str>, total_chunks: usize) -> String {
    format!(
        "I could not find relevant information for \"{query}\" in {document}.\n\n\
         Suggestions:\n\
         - Rephrase the question\n\
         - Use different keywords\n\
         - Ask about a more specific topic\n\n\
         Chunks analyzed: {total_chunks}",
        query = query,
        document = document_label(filename),
        total_chunks = total_chunks,
    )
}

fn footer(fragments: usize, top_score: f32, total_chunks: usize) -> String {
    format!(
        "\n\n---\nRelevant fragments found: {}\nTop match: {:.1}%\nChunks analyzed: {}",
        fragments,
        top_score * 100.0,
        total_chunks
    )
}
