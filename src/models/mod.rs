pub mod answer;
pub mod difficulty;
pub mod document;
pub mod loaders;
pub mod quiz;

pub use answer::{AnswerSheet, GradingOutcome, GradingResult, QuestionVerdict};
pub use difficulty::Difficulty;
pub use document::{
    DocumentKind, ExtractedContent, ExtractionReport, ExtractionWarning, UploadLimits,
    UploadedDocument,
};
pub use loaders::{load_document, load_documents, LoadedDocuments};
pub use quiz::{renumber, OptionKey, Question, Quiz, QuizBatch, QuizRequest};
