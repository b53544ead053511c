//! 答案生成服务 - 业务能力层
//!
//! 把一道题交给 LLM，拿回它认为正确的选项文字。
//! 频率受限或临时错误时按 `RetryPolicy` 重试，最终失败则随机选一个选项，
//! 任何情况下都不向调用方返回错误。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::infrastructure::{Generator, Sleeper, TokioSleeper};
use crate::models::{OptionSet, Question};
use crate::services::fallback_selector::FallbackSelector;
use crate::services::llm_service::OpenAiGenerator;
use crate::services::retry::RetryPolicy;

/// 系统消息
pub const SYSTEM_MESSAGE: &str = "你是一个帮助用户快速选出正确答案的助手。";

/// LLM 给出的候选答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// 模型回答（已去除首尾空白）
    Generated(String),
    /// 重试耗尽或遇到不可重试错误，已随机选择
    Fallback { index: usize, option: String },
}

impl Proposal {
    pub fn text(&self) -> &str {
        match self {
            Proposal::Generated(text) => text,
            Proposal::Fallback { option, .. } => option,
        }
    }
}

/// 答案生成服务
pub struct AnswerOracle {
    generator: Arc<dyn Generator>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    fallback: Arc<FallbackSelector>,
}

impl AnswerOracle {
    pub fn new(
        generator: Arc<dyn Generator>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
        fallback: Arc<FallbackSelector>,
    ) -> Self {
        Self {
            generator,
            policy,
            sleeper,
            fallback,
        }
    }

    /// 按配置创建，使用 OpenAI 兼容接口
    pub fn from_config(config: &Config, fallback: Arc<FallbackSelector>) -> Self {
        let policy = RetryPolicy::new(config.oracle_max_attempts, config.oracle_backoff_base());
        Self::new(
            Arc::new(OpenAiGenerator::new(config)),
            policy,
            Arc::new(TokioSleeper),
            fallback,
        )
    }

    /// 为一道题生成候选答案
    pub async fn propose(&self, question: &Question, options: &OptionSet) -> Proposal {
        let prompt = build_prompt(question, options);

        for attempt in 1..=self.policy.max_attempts {
            match self.generator.generate(&prompt).await {
                Ok(text) => {
                    debug!("第 {} 题 LLM 原始回答: {:?}", question.ordinal, text);
                    return Proposal::Generated(text.trim().to_string());
                }
                Err(e) if e.is_retryable() => match self.policy.backoff_after(attempt) {
                    Some(wait) => {
                        warn!(
                            "第 {} 题 {}，{:.1} 秒后重试 ({}/{})",
                            question.ordinal,
                            e,
                            wait.as_secs_f32(),
                            attempt,
                            self.policy.max_attempts
                        );
                        self.sleeper.sleep(wait).await;
                    }
                    None => {
                        warn!(
                            "第 {} 题 {}，已达最大重试次数，随机选择一个答案",
                            question.ordinal, e
                        );
                        break;
                    }
                },
                Err(e) => {
                    warn!("第 {} 题 {}，随机选择一个答案", question.ordinal, e);
                    break;
                }
            }
        }

        let (index, option) = self.fallback.pick(options);
        Proposal::Fallback {
            index,
            option: option.to_string(),
        }
    }
}

/// 构建提示词：要求只返回最合适选项的原文
pub fn build_prompt(question: &Question, options: &OptionSet) -> String {
    let option_lines: Vec<String> = options.iter().map(|o| format!("- {}", o)).collect();
    format!(
        "题目: {}\n选项:\n{}\n只返回最合适的那个选项的原文，不要任何解释。",
        question.text,
        option_lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// 按脚本依次返回结果
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<String, GenerationError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<String, GenerationError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.lock().unwrap().push(prompt.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Other("脚本已用完".into())))
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    fn fixture() -> (Question, OptionSet) {
        (
            Question::new(1, "收到陌生人传来的链接，应该怎么做？"),
            OptionSet::new(vec![
                "A. 立刻点开".to_string(),
                "B. 不要点开并告诉师长".to_string(),
                "C. 转发给朋友".to_string(),
            ])
            .unwrap(),
        )
    }

    fn oracle(generator: Arc<ScriptedGenerator>, sleeper: Arc<RecordingSleeper>) -> AnswerOracle {
        AnswerOracle::new(
            generator,
            RetryPolicy::new(3, Duration::from_secs(2)),
            sleeper,
            Arc::new(FallbackSelector::seeded(3)),
        )
    }

    #[test]
    fn test_prompt_lists_question_and_options() {
        let (question, options) = fixture();
        let prompt = build_prompt(&question, &options);
        assert!(prompt.contains(&question.text));
        for option in options.iter() {
            assert!(prompt.contains(option));
        }
        assert!(prompt.contains("不要任何解释"));
    }

    #[tokio::test]
    async fn test_success_is_trimmed() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok("  不要点开并告诉师长 \n".into())]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let (question, options) = fixture();

        let proposal = oracle(generator.clone(), sleeper.clone())
            .propose(&question, &options)
            .await;

        assert_eq!(proposal, Proposal::Generated("不要点开并告诉师长".into()));
        assert_eq!(generator.call_count(), 1);
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_three_times_falls_back() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Err(GenerationError::RateLimited("429".into())),
            Err(GenerationError::RateLimited("429".into())),
            Err(GenerationError::RateLimited("429".into())),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let (question, options) = fixture();

        let proposal = oracle(generator.clone(), sleeper.clone())
            .propose(&question, &options)
            .await;

        match proposal {
            Proposal::Fallback { index, option } => {
                assert!(options.contains(&option));
                assert_eq!(options.get(index), Some(option.as_str()));
            }
            other => panic!("应当随机兜底，实际: {:?}", other),
        }
        assert_eq!(generator.call_count(), 3);
        assert_eq!(
            *sleeper.sleeps.lock().unwrap(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_recovers_after_transient_error() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Err(GenerationError::Transient("timeout".into())),
            Ok("C. 转发给朋友".into()),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let (question, options) = fixture();

        let proposal = oracle(generator.clone(), sleeper.clone())
            .propose(&question, &options)
            .await;

        assert_eq!(proposal.text(), "C. 转发给朋友");
        assert_eq!(generator.call_count(), 2);
        assert_eq!(*sleeper.sleeps.lock().unwrap(), vec![Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn test_non_retryable_falls_back_immediately() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(GenerationError::Other(
            "invalid api key".into(),
        ))]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let (question, options) = fixture();

        let proposal = oracle(generator.clone(), sleeper.clone())
            .propose(&question, &options)
            .await;

        assert!(matches!(proposal, Proposal::Fallback { .. }));
        assert!(options.contains(proposal.text()));
        assert_eq!(generator.call_count(), 1);
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
    }
}
