//! 单场答题 - 编排层
//!
//! ## 职责
//!
//! 驱动一场考试从开始到提交的状态机：
//!
//! ```text
//! NotStarted → Extracting → Answering → Submitting → Completed
//!      │            │                        │
//!      └────────────┴──────── Failed ────────┘
//! ```
//!
//! - 单题提取失败只记录，不中断本场
//! - 一题都没提取到时不提交
//! - 作答严格按题号顺序进行

use tracing::{debug, error, info, warn};

use crate::error::{ExtractionError, SessionError};
use crate::infrastructure::{ExamActivator, ExamExtractor};
use crate::models::{
    AttemptState, ExtractedQuestion, OptionSet, Question, QuestionOutcome, SessionOutcome,
};
use crate::workflow::{QuestionCtx, QuestionFlow};

/// 单场答题
pub struct QuizSession<'a> {
    attempt: u32,
    question_count: usize,
    extractor: &'a dyn ExamExtractor,
    activator: &'a dyn ExamActivator,
    flow: &'a QuestionFlow,
    state: AttemptState,
}

impl<'a> QuizSession<'a> {
    pub fn new(
        attempt: u32,
        question_count: usize,
        extractor: &'a dyn ExamExtractor,
        activator: &'a dyn ExamActivator,
        flow: &'a QuestionFlow,
    ) -> Self {
        Self {
            attempt,
            question_count,
            extractor,
            activator,
            flow,
            state: AttemptState::NotStarted,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// 跑完整场，返回每题结果；结束后 `state()` 为 Completed 或 Failed
    pub async fn run(&mut self) -> Result<SessionOutcome, SessionError> {
        if let Err(e) = self.activator.start_exam().await {
            self.transition(AttemptState::Failed);
            error!("[第 {} 场] ❌ 开始考试失败: {}", self.attempt, e);
            return Err(SessionError::StartFailed(e));
        }

        // ========== 提取 ==========
        self.transition(AttemptState::Extracting);
        let extracted = self.extract_all().await;

        let extracted_count = extracted.iter().filter(|r| r.is_ok()).count();
        if extracted_count == 0 {
            self.transition(AttemptState::Failed);
            error!(
                "[第 {} 场] ❌ {} 道题全部提取失败，不提交",
                self.attempt, self.question_count
            );
            return Err(SessionError::NoQuestions {
                attempted: self.question_count,
            });
        }
        info!(
            "[第 {} 场] ✓ 提取到 {}/{} 道题",
            self.attempt, extracted_count, self.question_count
        );

        // ========== 作答 ==========
        self.transition(AttemptState::Answering);
        let mut outcomes = Vec::with_capacity(extracted.len());
        for (index, item) in extracted.into_iter().enumerate() {
            let ordinal = index + 1;
            let outcome = match item {
                Ok(question) => {
                    let ctx = QuestionCtx::new(self.attempt, ordinal, self.question_count);
                    self.flow.run(self.activator, &ctx, &question).await
                }
                Err(error) => QuestionOutcome::ExtractionFailed { ordinal, error },
            };
            outcomes.push(outcome);
        }

        // ========== 提交 ==========
        self.transition(AttemptState::Submitting);
        let unanswered = outcomes.iter().filter(|o| !o.is_answered()).count();
        if unanswered > 0 {
            warn!(
                "[第 {} 场] ⚠️ 部分作答: {} 道题未作答，仍然提交",
                self.attempt, unanswered
            );
        }

        if let Err(e) = self.activator.submit_exam().await {
            self.transition(AttemptState::Failed);
            error!("[第 {} 场] ❌ 提交失败: {}", self.attempt, e);
            return Err(SessionError::SubmitFailed(e));
        }

        self.transition(AttemptState::Completed);
        info!("[第 {} 场] ✅ 已提交", self.attempt);

        Ok(SessionOutcome {
            attempt: self.attempt,
            state: self.state,
            outcomes,
        })
    }

    /// 按题号读取全部题目，失败的题记录错误
    async fn extract_all(&self) -> Vec<Result<ExtractedQuestion, ExtractionError>> {
        let mut extracted = Vec::with_capacity(self.question_count);

        for ordinal in 1..=self.question_count {
            let result = self.extract_one(ordinal).await;
            if let Err(e) = &result {
                let ctx = QuestionCtx::new(self.attempt, ordinal, self.question_count);
                warn!("{} ⚠️ {}，跳过", ctx, e);
                self.flow.record(&ctx, "提取失败", &e.to_string()).await;
            }
            extracted.push(result);
        }

        extracted
    }

    async fn extract_one(&self, ordinal: usize) -> Result<ExtractedQuestion, ExtractionError> {
        let (text, options) = self.extractor.extract_question(ordinal).await?;
        let options = OptionSet::new(options).ok_or(ExtractionError::NoOptions { ordinal })?;

        Ok(ExtractedQuestion {
            question: Question::new(ordinal, text),
            options,
        })
    }

    fn transition(&mut self, next: AttemptState) {
        debug!("[第 {} 场] 状态: {} → {}", self.attempt, self.state, next);
        self.state = next;
    }
}
