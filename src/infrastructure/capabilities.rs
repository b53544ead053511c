//! 外部能力接口
//!
//! 核心流程只通过这几个 trait 与外界交互：LLM、考试页面、时间

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ActivationError, ExamError, ExtractionError, GenerationError};

/// 文本生成能力
#[async_trait]
pub trait Generator: Send + Sync {
    /// 发送提示词，返回模型的原始回答
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// 题目提取能力
#[async_trait]
pub trait ExamExtractor: Send + Sync {
    /// 读取第 `ordinal` 题的题干与按页面顺序排列的选项
    async fn extract_question(&self, ordinal: usize) -> Result<(String, Vec<String>), ExtractionError>;
}

/// 页面操作能力
#[async_trait]
pub trait ExamActivator: Send + Sync {
    async fn start_exam(&self) -> Result<(), ExamError>;

    /// 点击第 `ordinal` 题中文字为 `option` 的选项
    async fn activate_option(&self, ordinal: usize, option: &str) -> Result<(), ActivationError>;

    async fn submit_exam(&self) -> Result<(), ExamError>;
}

/// 等待能力，测试中替换为不真正等待的实现
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// 基于 tokio 的等待
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
