//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. LLM 生成候选答案（失败时已随机兜底）
//! 2. 候选答案 → 选项匹配
//! 3. 匹配不上 → 随机选择
//! 4. 点击选项
//! 5. 随机作答与点击失败写入记录文件

use std::sync::Arc;

use tracing::{info, warn};

use crate::infrastructure::ExamActivator;
use crate::models::{ExtractedQuestion, OptionSet, QuestionOutcome, ResolvedAnswer};
use crate::services::option_matcher::{self, MatchResult};
use crate::services::{AnswerOracle, AuditWriter, FallbackSelector, Proposal};
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;

/// 题目处理流程
///
/// - 编排 生成 → 匹配 → 兜底 → 点击
/// - 不持有页面资源，只依赖能力接口
pub struct QuestionFlow {
    oracle: AnswerOracle,
    fallback: Arc<FallbackSelector>,
    audit: Option<AuditWriter>,
}

impl QuestionFlow {
    pub fn new(oracle: AnswerOracle, fallback: Arc<FallbackSelector>, audit: Option<AuditWriter>) -> Self {
        Self {
            oracle,
            fallback,
            audit,
        }
    }

    /// 只决定答案，不点击
    pub async fn resolve(&self, ctx: &QuestionCtx, item: &ExtractedQuestion) -> ResolvedAnswer {
        let ExtractedQuestion { question, options } = item;

        info!("{} 题干: {}", ctx, truncate_text(&question.text, 80));

        let proposal = self.oracle.propose(question, options).await;
        let answer = match proposal {
            Proposal::Fallback { index, option } => {
                warn!("{} ⚠️ LLM 不可用，随机选择: {}", ctx, option);
                ResolvedAnswer::fallback(index, option)
            }
            Proposal::Generated(text) => self.match_or_guess(ctx, &text, options),
        };

        if answer.is_guess() {
            self.record(ctx, "随机作答", &format!("{} -> {}", question.text, answer.option))
                .await;
        }

        answer
    }

    /// 决定答案并点击
    pub async fn run(
        &self,
        activator: &dyn ExamActivator,
        ctx: &QuestionCtx,
        item: &ExtractedQuestion,
    ) -> QuestionOutcome {
        let answer = self.resolve(ctx, item).await;

        match activator.activate_option(ctx.ordinal, &answer.option).await {
            Ok(()) => {
                info!("{} ✓ 已选择 [{}] {}", ctx, answer.resolution, answer.option);
                QuestionOutcome::Answered {
                    ordinal: ctx.ordinal,
                    answer,
                }
            }
            Err(error) => {
                warn!("{} ⚠️ {}", ctx, error);
                self.record(ctx, "点击失败", &error.to_string()).await;
                QuestionOutcome::ActivationFailed {
                    ordinal: ctx.ordinal,
                    answer,
                    error,
                }
            }
        }
    }

    /// 记录一条需要人工核查的信息，写入失败只打日志
    pub async fn record(&self, ctx: &QuestionCtx, kind: &str, detail: &str) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.write(ctx.attempt, ctx.ordinal, kind, detail).await {
                warn!("{} 写入记录文件 {} 失败: {}", ctx, audit.path().display(), e);
            }
        }
    }

    fn match_or_guess(&self, ctx: &QuestionCtx, text: &str, options: &OptionSet) -> ResolvedAnswer {
        match option_matcher::resolve(text, options) {
            MatchResult::Matched { index, option } => {
                info!("{} 🤖 LLM 回答: {} → 匹配选项 {}", ctx, text, index + 1);
                ResolvedAnswer::matched(index, option)
            }
            MatchResult::NoMatch => {
                let (index, option) = self.fallback.pick(options);
                warn!(
                    "{} ⚠️ 未找到对应的答案: {:?}，随机选择: {}",
                    ctx, text, option
                );
                ResolvedAnswer::fallback(index, option)
            }
        }
    }
}
