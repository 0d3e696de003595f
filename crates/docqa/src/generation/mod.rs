//! Answer generation: question classification, local synthesis and prompts

pub mod classifier;
pub mod prompt;
pub mod synthesizer;

pub use classifier::{ClassificationRule, QuestionClassifier, QuestionKind};
pub use prompt::PromptBuilder;
pub use synthesizer::AnswerSynthesizer;
