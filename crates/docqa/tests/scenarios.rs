//! End-to-end behaviour of the chunk, rank and answer pipeline

use docqa::config::{ChunkGranularity, DocQaConfig};
use docqa::generation::AnswerSynthesizer;
use docqa::retrieval::tokenize_query;
use docqa::{QaPipeline, ScoredChunk};

const PARIS: &str =
    "Paris is the capital of France. It has the Eiffel Tower. The Louvre is a famous museum.";

fn is_no_results(response: &str) -> bool {
    response.starts_with("I could not find relevant information")
}

#[test]
fn capital_of_france() {
    let pipeline = QaPipeline::default();
    let chunks = pipeline.chunk(PARIS);
    assert_eq!(chunks.len(), 1);

    assert_eq!(tokenize_query("capital of France", 3), vec!["capital", "france"]);

    let answer = pipeline.answer("capital of France", &chunks, Some("paris.txt"));
    assert_eq!(answer.chunks.len(), 1);
    assert!(answer.chunks[0].score > 0.5);
    assert!(!is_no_results(&answer.response));
    assert!(answer.response.contains(PARIS));
    assert!(answer.response.contains("Chunks analyzed: 1"));
}

#[test]
fn empty_document() {
    let pipeline = QaPipeline::default();
    let chunks = pipeline.chunk("");
    assert!(chunks.is_empty());

    let answer = pipeline.answer("anything at all", &chunks, Some("empty.txt"));
    assert!(answer.chunks.is_empty());
    assert!(is_no_results(&answer.response));
    assert!(answer.response.contains("Chunks analyzed: 0"));
}

#[test]
fn title_question_embeds_first_chunk() {
    let pipeline = QaPipeline::default();
    let text = format!(
        "Квантовые вычисления сегодня.\n\nНазвание этой работы описывает {}подход.",
        "очень ".repeat(45)
    );
    let chunks = pipeline.chunk(&text);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content, "Квантовые вычисления сегодня.");

    let answer = pipeline.answer("Какое название у этой работы?", &chunks, None);
    assert!(!answer.chunks.is_empty());
    assert!(answer
        .response
        .starts_with("Title of the document: \"Квантовые вычисления сегодня.\"\n\n"));
}

#[test]
fn equal_high_confidence_chunks_keep_document_order() {
    let synthesizer = AnswerSynthesizer::default();
    let chunks = QaPipeline::default().chunk("Alpha fact sentence. Beta fact sentence.");
    let ranked = vec![
        ScoredChunk {
            content: "Alpha fact sentence.".to_string(),
            score: 0.4,
            source: "Chunk 1 (3 words)".to_string(),
            chunk_index: 0,
        },
        ScoredChunk {
            content: "Beta fact sentence.".to_string(),
            score: 0.4,
            source: "Chunk 2 (3 words)".to_string(),
            chunk_index: 1,
        },
    ];

    let response = synthesizer.synthesize("fact", &ranked, &chunks, None);
    assert!(response.contains("1. Alpha fact sentence.\n\n2. Beta fact sentence."));
}

#[test]
fn short_tokens_only() {
    let pipeline = QaPipeline::default();
    let chunks = pipeline.chunk(PARIS);

    let scores = pipeline.scorer().score_all("is it of an", &chunks);
    assert!(scores.iter().all(|s| *s == 0.0));

    let answer = pipeline.answer("is it of an", &chunks, None);
    assert!(is_no_results(&answer.response));
}

#[test]
fn unrelated_query_ranks_on_position_bonus() {
    let pipeline = QaPipeline::default();
    let chunks = pipeline.chunk(PARIS);

    let scores = pipeline.scorer().score_all("submarine propulsion", &chunks);
    assert!((scores[0] - 0.1).abs() < 1e-6);

    let answer = pipeline.answer("submarine propulsion", &chunks, Some("paris.txt"));
    assert_eq!(answer.chunks.len(), 1);
    assert!(!is_no_results(&answer.response));
    assert!(answer.response.contains("Top match: 10.0%"));
}

#[test]
fn no_results_names_query_and_document() {
    let pipeline = QaPipeline::default();
    let chunks = pipeline.chunk(PARIS);
    let answer = pipeline.answer("is it so", &chunks, Some("paris.txt"));

    assert!(is_no_results(&answer.response));
    assert!(answer.response.contains("\"is it so\""));
    assert!(answer.response.contains("paris.txt"));
    assert!(answer.response.contains("Chunks analyzed: 1"));
}

#[test]
fn answers_are_deterministic() {
    let pipeline = QaPipeline::default();
    let text = "Rust has ownership. Ownership rules are checked at compile time. \
                The borrow checker enforces the rules. Lifetimes describe how long references live.";
    let chunks = pipeline.chunk(text);

    let first = pipeline.answer("ownership rules", &chunks, None);
    let second = pipeline.answer("ownership rules", &chunks, None);
    assert_eq!(first, second);
}

#[test]
fn paragraph_granularity() {
    let mut config = DocQaConfig::default();
    config.chunking.granularity = ChunkGranularity::Paragraph;
    let pipeline = QaPipeline::new(&config);

    let chunks = pipeline.chunk("Rivers flow into the sea\n\nMountains rise above the clouds");
    assert_eq!(chunks.len(), 2);

    let answer = pipeline.answer("mountains", &chunks, None);
    assert_eq!(answer.chunks[0].source, "Paragraph 2 (5 words)");
}
