//! # Quiz Autoanswer
//!
//! 在浏览器里自动完成单选题测验：读题 → 问 LLM → 匹配选项 → 点击 → 提交
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `ExamPage` - 题目提取、选项点击、开始与提交
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 Question
//! - `AnswerOracle` - LLM 出答案，带重试与随机兜底
//! - `option_matcher` / `text_normalizer` - 回答与选项的匹配
//! - `FallbackSelector` - 随机选择
//! - `AuditWriter` - 记录猜测与失败
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（attempt + ordinal）
//! - `QuestionFlow` - 流程编排（oracle → matcher → fallback → click）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/quiz_session` - 单场状态机
//! - `orchestrator/run_loop` - 多场循环，场间冷却与崩溃隔离
//! - `orchestrator/app` - 浏览器启动、人工登录与组装

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{BrowserError, ConfigError, SessionError};
pub use infrastructure::{ExamActivator, ExamExtractor, Generator, JsExecutor, Sleeper};
pub use models::{ExtractedQuestion, OptionSet, Question, SessionOutcome};
pub use orchestrator::{App, AttemptRunner, QuizSession, RunLoop};
pub use workflow::{QuestionCtx, QuestionFlow};
