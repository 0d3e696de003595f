//! Lexical relevance scoring
//!
//! A chunk's score is built from five independent sub-scores:
//!
//! | sub-score        | value                                              |
//! |------------------|----------------------------------------------------|
//! | exact match      | `exact_match_weight` per whole-word occurrence     |
//! | substring        | `substring_weight` once if the term occurs at all  |
//! | variant          | `variant_weight` per inflected form found          |
//! | length bonus     | `length_bonus` for chunks of a readable size       |
//! | position bonus   | up to `position_bonus`, decaying over the document |
//!
//! The three match scores are summed over the query terms and divided by the
//! number of terms. Both bonuses are added to every chunk once the query has
//! at least one term, and the total is capped at 1.0.

use regex::Regex;

use crate::config::{ChunkGranularity, ScoringConfig};
use crate::types::{Chunk, ScoredChunk};

fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

fn is_term_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_cyrillic_letter(c)
}

/// Turn a query into the list of terms that are matched against chunks.
///
/// Lowercases, splits on whitespace, strips characters that are neither
/// ASCII alphanumerics nor Cyrillic letters, and drops terms shorter than
/// `min_token_len` characters. Duplicates are removed, first occurrence wins.
pub fn tokenize_query(query: &str, min_token_len: usize) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    for raw in query.to_lowercase().split_whitespace() {
        let term: String = raw.chars().filter(|c| is_term_char(*c)).collect();
        if term.chars().count() < min_token_len {
            continue;
        }
        if !terms.contains(&term) {
            terms.push(term);
        }
    }

    terms
}

/// A query term prepared for matching
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    whole_word: Option<Regex>,
    variants: Vec<String>,
}

impl TermMatcher {
    /// Prepare a (lowercase) term and its inflected variants
    pub fn new(term: &str, suffixes: &[String]) -> Self {
        let whole_word = match Regex::new(&format!(r"\b{}\b", regex::escape(term))) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("Cannot build word pattern for '{}': {}", term, e);
                None
            }
        };

        Self {
            term: term.to_string(),
            whole_word,
            variants: suffixes.iter().map(|s| format!("{}{}", term, s)).collect(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

/// `weight` per whole-word occurrence of the term
pub fn exact_match_score(content: &str, matcher: &TermMatcher, weight: f32) -> f32 {
    match &matcher.whole_word {
        Some(re) => re.find_iter(content).count() as f32 * weight,
        None => 0.0,
    }
}

/// Flat `weight` if the term occurs anywhere, even inside another word
pub fn substring_score(content: &str, matcher: &TermMatcher, weight: f32) -> f32 {
    if content.contains(matcher.term.as_str()) {
        weight
    } else {
        0.0
    }
}

/// Flat `weight` for each inflected variant of the term found in the content
pub fn variant_score(content: &str, matcher: &TermMatcher, weight: f32) -> f32 {
    let found = matcher
        .variants
        .iter()
        .filter(|variant| content.contains(variant.as_str()))
        .count();
    found as f32 * weight
}

/// `bonus` when `char_len` lies within `[min, max]`
pub fn length_bonus(char_len: usize, min: usize, max: usize, bonus: f32) -> f32 {
    if (min..=max).contains(&char_len) {
        bonus
    } else {
        0.0
    }
}

/// `max_bonus` for the first chunk, decaying linearly towards 0 at the end
pub fn position_bonus(chunk_index: u32, total_chunks: usize, max_bonus: f32) -> f32 {
    if total_chunks == 0 {
        return 0.0;
    }
    let relative = chunk_index as f32 / total_chunks as f32;
    (max_bonus - relative * max_bonus).max(0.0)
}

/// Sub-scores of one chunk, kept for inspection and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub exact: f32,
    pub substring: f32,
    pub variant: f32,
    /// (exact + substring + variant) / number of terms
    pub base: f32,
    pub length_bonus: f32,
    pub position_bonus: f32,
    /// Final score, at most 1.0
    pub total: f32,
}

/// Scores and ranks chunks against a query
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    config: ScoringConfig,
    granularity: ChunkGranularity,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default(), ChunkGranularity::default())
    }
}

impl RelevanceScorer {
    /// Create a scorer; `granularity` only affects the source labels
    pub fn new(config: &ScoringConfig, granularity: ChunkGranularity) -> Self {
        Self {
            config: config.clone(),
            granularity,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Query terms as the scorer sees them
    pub fn tokenize(&self, query: &str) -> Vec<String> {
        tokenize_query(query, self.config.min_token_len)
    }

    fn matchers(&self, query: &str) -> Vec<TermMatcher> {
        self.tokenize(query)
            .iter()
            .map(|term| TermMatcher::new(term, &self.config.variant_suffixes))
            .collect()
    }

    /// Score one chunk against prepared term matchers
    pub fn score_chunk(
        &self,
        chunk: &Chunk,
        matchers: &[TermMatcher],
        total_chunks: usize,
    ) -> ScoreBreakdown {
        if matchers.is_empty() {
            return ScoreBreakdown::default();
        }

        let content = chunk.content.to_lowercase();
        let mut breakdown = ScoreBreakdown::default();

        for matcher in matchers {
            breakdown.exact += exact_match_score(&content, matcher, self.config.exact_match_weight);
            breakdown.substring += substring_score(&content, matcher, self.config.substring_weight);
            breakdown.variant += variant_score(&content, matcher, self.config.variant_weight);
        }

        breakdown.base =
            (breakdown.exact + breakdown.substring + breakdown.variant) / matchers.len() as f32;

        breakdown.length_bonus = length_bonus(
            chunk.char_len(),
            self.config.length_bonus_min,
            self.config.length_bonus_max,
            self.config.length_bonus,
        );
        breakdown.position_bonus =
            position_bonus(chunk.chunk_index, total_chunks, self.config.position_bonus);

        let total = breakdown.base + breakdown.length_bonus + breakdown.position_bonus;
        debug_assert!(total >= 0.0, "sub-scores must be non-negative");
        breakdown.total = total.min(1.0);

        breakdown
    }

    /// Score every chunk, in document order
    pub fn score_all(&self, query: &str, chunks: &[Chunk]) -> Vec<f32> {
        let matchers = self.matchers(query);
        if matchers.is_empty() {
            return vec![0.0; chunks.len()];
        }

        chunks
            .iter()
            .map(|chunk| self.score_chunk(chunk, &matchers, chunks.len()).total)
            .collect()
    }

    /// Top chunks for a query.
    ///
    /// Keeps chunks scoring above `min_relevance`, sorts by descending score
    /// (equal scores keep document order) and truncates to `top_k`.
    pub fn rank(&self, query: &str, chunks: &[Chunk]) -> Vec<ScoredChunk> {
        let scores = self.score_all(query, chunks);

        let mut ranked: Vec<ScoredChunk> = chunks
            .iter()
            .zip(scores)
            .filter(|(_, score)| *score > self.config.min_relevance)
            .map(|(chunk, score)| ScoredChunk {
                content: chunk.content.clone(),
                score,
                source: self.source_label(chunk),
                chunk_index: chunk.chunk_index,
            })
            .collect();

        // sort_by is stable, so ties stay in document order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(self.config.top_k);

        tracing::debug!(
            "Ranked {} of {} chunks for query \"{}\"",
            ranked.len(),
            chunks.len(),
            query
        );

        ranked
    }

    /// Display label for a chunk, e.g. "Chunk 3 (42 words)"
    pub fn source_label(&self, chunk: &Chunk) -> String {
        let unit = match self.granularity {
            ChunkGranularity::Sentence => "Chunk",
            ChunkGranularity::Paragraph => "Paragraph",
        };
        format!("{} {} ({} words)", unit, chunk.chunk_index + 1, chunk.word_count)
    }
}
