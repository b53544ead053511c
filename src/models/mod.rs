pub mod outcome;
pub mod question;

pub use outcome::{AttemptState, QuestionOutcome, ResolvedAnswer, Resolution, RunSummary, SessionOutcome};
pub use question::{ExtractedQuestion, OptionSet, Question};
