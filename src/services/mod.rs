pub mod content_extractor;
pub mod grading;
pub mod llm_service;
pub mod prompt_builder;
pub mod response_parser;

pub use content_extractor::ContentExtractor;
pub use grading::{grade, render_feedback, render_question};
pub use llm_service::{LlmService, QuizModel};
pub use prompt_builder::build_prompt;
pub use response_parser::{parse_batch, strip_code_fence};
