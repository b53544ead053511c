pub mod answer_oracle;
pub mod audit_writer;
pub mod fallback_selector;
pub mod llm_service;
pub mod option_matcher;
pub mod retry;
pub mod text_normalizer;

pub use answer_oracle::{AnswerOracle, Proposal};
pub use audit_writer::AuditWriter;
pub use fallback_selector::FallbackSelector;
pub use llm_service::OpenAiGenerator;
pub use option_matcher::MatchResult;
pub use retry::RetryPolicy;
