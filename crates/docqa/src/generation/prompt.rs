//! Prompt templates for remote answer generation

use crate::types::ScoredChunk;

/// Prompt builder for chat-completion backends
pub struct PromptBuilder;

impl PromptBuilder {
    /// System prompt restricting the model to the supplied context
    pub fn system_prompt() -> &'static str {
        r#"You are an assistant for analysing documents. Answer the user's questions using the context taken from their document.

Rules:
1. Use only information from the provided context
2. If the context does not contain the answer, say so honestly
3. Answer in the language of the question
4. Be precise and specific
5. Refer to the specific fragments of the text you rely on"#
    }

    /// Join the best `limit` chunks into a context block
    pub fn build_context(ranked: &[ScoredChunk], limit: usize) -> String {
        ranked
            .iter()
            .take(limit)
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// User message carrying the context and the question
    pub fn user_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Context from the document:
{context}

User question: {question}

Answer the question based on the provided context."#,
            context = context,
            question = question
        )
    }
}
