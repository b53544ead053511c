//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 管理浏览器资源（Browser、ExamPage）
//! - 输出全局统计信息
//!
//! ### `run_loop` - 多场循环
//! - 连续跑多场，场间等待或冷却
//! - 单场 panic 隔离
//!
//! ### `quiz_session` - 单场答题
//! - 开始 → 提取 → 作答 → 提交
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! run_loop (多场)
//!     ↓
//! quiz_session (单场 Vec<Question>)
//!     ↓
//! workflow::QuestionFlow (单题)
//!     ↓
//! services (能力层：oracle / matcher / fallback / audit)
//!     ↓
//! infrastructure (基础设施：ExamPage / JsExecutor)
//! ```

pub mod app;
pub mod quiz_session;
pub mod run_loop;

pub use app::App;
pub use quiz_session::QuizSession;
pub use run_loop::{AttemptRunner, RunLoop};
