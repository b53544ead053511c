//! 基础设施层
//!
//! 持有稀缺资源（Page），只暴露能力

pub mod capabilities;
pub mod exam_page;
pub mod js_executor;

pub use capabilities::{ExamActivator, ExamExtractor, Generator, Sleeper, TokioSleeper};
pub use exam_page::ExamPage;
pub use js_executor::JsExecutor;
