//! Property tests for chunking and scoring

use docqa::config::ScoringConfig;
use docqa::ingestion::TextChunker;
use docqa::retrieval::RelevanceScorer;
use docqa::{Chunk, QaPipeline};
use proptest::prelude::*;

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..8).prop_map(|words| format!("{}.", words.join(" ")))
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![" ", "\n", "  \n\t", "\n\n"])
}

fn document() -> impl Strategy<Value = Vec<(String, &'static str)>> {
    prop::collection::vec((sentence(), separator()), 0..30)
}

fn render(parts: &[(String, &'static str)]) -> String {
    parts
        .iter()
        .map(|(sentence, sep)| format!("{}{}", sentence, sep))
        .collect()
}

proptest! {
    #[test]
    fn chunks_cover_every_kept_sentence(parts in document(), chunk_size in 20usize..400) {
        let chunker = TextChunker::with_chunk_size(chunk_size);
        let chunks = chunker.chunk(&render(&parts));

        let expected: Vec<&str> = parts
            .iter()
            .map(|(s, _)| s.as_str())
            .filter(|s| s.chars().count() >= 10)
            .collect();
        let joined: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();

        prop_assert_eq!(joined.join(" "), expected.join(" "));
    }

    #[test]
    fn chunks_respect_size_unless_single_sentence(parts in document(), chunk_size in 20usize..400) {
        let chunker = TextChunker::with_chunk_size(chunk_size);
        for chunk in chunker.chunk(&render(&parts)) {
            let single_sentence = chunk.content.matches('.').count() == 1;
            prop_assert!(chunk.char_len() <= chunk_size || single_sentence);
            prop_assert!(!chunk.content.trim().is_empty());
        }
    }

    #[test]
    fn chunk_indices_are_contiguous(parts in document()) {
        let chunks = TextChunker::default().chunk(&render(&parts));
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.chunk_index as usize, i);
            prop_assert_eq!(&chunk.id, &format!("chunk-{}", i));
        }
    }

    #[test]
    fn extra_occurrence_never_lowers_score(
        words in prop::collection::vec("[a-z]{1,8}", 0..120),
        term in "[a-z]{3,8}",
        index in 0u32..10,
    ) {
        let scorer = RelevanceScorer::default();
        let before = Chunk::new(index, words.join(" "));
        let after = Chunk::new(index, format!("{} {}", words.join(" "), term));

        let chunks_before = vec![before];
        let chunks_after = vec![after];
        let a = scorer.score_all(&term, &chunks_before)[0];
        let b = scorer.score_all(&term, &chunks_after)[0];
        prop_assert!(b >= a, "{} < {}", b, a);
    }

    #[test]
    fn ranking_is_sorted_and_stable(parts in document(), query in "[a-z]{3,5}( [a-z]{3,5}){0,2}") {
        let pipeline = QaPipeline::default();
        let chunks = pipeline.chunk(&render(&parts));
        let ranked = pipeline.rank(&query, &chunks);

        prop_assert!(ranked.len() <= ScoringConfig::default().top_k);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].chunk_index < pair[1].chunk_index);
            }
        }
        for chunk in &ranked {
            prop_assert!(chunk.score > 0.01 && chunk.score <= 1.0);
        }

        prop_assert_eq!(pipeline.answer(&query, &chunks, None), pipeline.answer(&query, &chunks, None));
    }

    #[test]
    fn short_queries_score_zero(parts in document(), query in "[a-z]{1,2}( [a-z]{1,2}){0,4}") {
        let pipeline = QaPipeline::default();
        let chunks = pipeline.chunk(&render(&parts));

        prop_assert!(pipeline.scorer().score_all(&query, &chunks).iter().all(|s| *s == 0.0));
        prop_assert!(pipeline.rank(&query, &chunks).is_empty());
    }
}
