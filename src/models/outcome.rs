//! 答题结果
//!
//! 单题结果 `QuestionOutcome` 汇总成单场结果 `SessionOutcome`，
//! 多场结果再汇总成 `RunSummary`

use std::fmt;

use crate::error::{ActivationError, ExtractionError};

/// 答案的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// LLM 的回答与某个选项对上了
    Matched,
    /// 随机选择
    Fallback,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Matched => write!(f, "匹配"),
            Resolution::Fallback => write!(f, "随机"),
        }
    }
}

/// 最终决定点击的选项
///
/// `option` 一定取自该题的 `OptionSet`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnswer {
    pub resolution: Resolution,
    /// 选项下标（0-based）
    pub index: usize,
    pub option: String,
}

impl ResolvedAnswer {
    pub fn matched(index: usize, option: impl Into<String>) -> Self {
        Self {
            resolution: Resolution::Matched,
            index,
            option: option.into(),
        }
    }

    pub fn fallback(index: usize, option: impl Into<String>) -> Self {
        Self {
            resolution: Resolution::Fallback,
            index,
            option: option.into(),
        }
    }

    pub fn is_guess(&self) -> bool {
        self.resolution == Resolution::Fallback
    }
}

/// 单题处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    /// 已作答
    Answered { ordinal: usize, answer: ResolvedAnswer },
    /// 选出了答案但点击失败
    ActivationFailed {
        ordinal: usize,
        answer: ResolvedAnswer,
        error: ActivationError,
    },
    /// 提取失败，跳过
    ExtractionFailed { ordinal: usize, error: ExtractionError },
}

impl QuestionOutcome {
    pub fn ordinal(&self) -> usize {
        match self {
            QuestionOutcome::Answered { ordinal, .. }
            | QuestionOutcome::ActivationFailed { ordinal, .. }
            | QuestionOutcome::ExtractionFailed { ordinal, .. } => *ordinal,
        }
    }

    pub fn answer(&self) -> Option<&ResolvedAnswer> {
        match self {
            QuestionOutcome::Answered { answer, .. }
            | QuestionOutcome::ActivationFailed { answer, .. } => Some(answer),
            QuestionOutcome::ExtractionFailed { .. } => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, QuestionOutcome::Answered { .. })
    }
}

/// 单场答题的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    NotStarted,
    Extracting,
    Answering,
    Submitting,
    Completed,
    Failed,
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Completed | AttemptState::Failed)
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttemptState::NotStarted => "未开始",
            AttemptState::Extracting => "提取题目",
            AttemptState::Answering => "作答",
            AttemptState::Submitting => "提交",
            AttemptState::Completed => "完成",
            AttemptState::Failed => "失败",
        };
        write!(f, "{}", name)
    }
}

/// 单场答题结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// 第几场（从1开始）
    pub attempt: u32,
    pub state: AttemptState,
    /// 按题号排列
    pub outcomes: Vec<QuestionOutcome>,
}

impl SessionOutcome {
    pub fn answered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_answered()).count()
    }

    /// 随机作答且已点击的题数
    pub fn guessed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.is_answered() && o.answer().is_some_and(ResolvedAnswer::is_guess))
            .count()
    }

    pub fn extraction_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, QuestionOutcome::ExtractionFailed { .. }))
            .count()
    }

    pub fn activation_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, QuestionOutcome::ActivationFailed { .. }))
            .count()
    }

    /// 每道题都已作答
    pub fn is_complete(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(QuestionOutcome::is_answered)
    }
}

/// 全部答题的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: u32,
    pub completed: u32,
    pub failed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(outcomes: Vec<QuestionOutcome>) -> SessionOutcome {
        SessionOutcome {
            attempt: 1,
            state: AttemptState::Completed,
            outcomes,
        }
    }

    #[test]
    fn test_counts() {
        let session = outcome(vec![
            QuestionOutcome::Answered {
                ordinal: 1,
                answer: ResolvedAnswer::matched(0, "A"),
            },
            QuestionOutcome::Answered {
                ordinal: 2,
                answer: ResolvedAnswer::fallback(1, "B"),
            },
            QuestionOutcome::ExtractionFailed {
                ordinal: 3,
                error: ExtractionError::NotFound { ordinal: 3 },
            },
            QuestionOutcome::ActivationFailed {
                ordinal: 4,
                answer: ResolvedAnswer::fallback(0, "C"),
                error: ActivationError::NotFound {
                    ordinal: 4,
                    option: "C".to_string(),
                },
            },
        ]);

        assert_eq!(session.answered_count(), 2);
        assert_eq!(session.guessed_count(), 1);
        assert_eq!(session.extraction_failures(), 1);
        assert_eq!(session.activation_failures(), 1);
        assert!(!session.is_complete());
        assert_eq!(session.outcomes[2].ordinal(), 3);
        assert!(session.outcomes[2].answer().is_none());
    }

    #[test]
    fn test_complete_requires_answers() {
        assert!(!outcome(Vec::new()).is_complete());
        assert!(outcome(vec![QuestionOutcome::Answered {
            ordinal: 1,
            answer: ResolvedAnswer::matched(0, "A"),
        }])
        .is_complete());
    }

    #[test]
    fn test_terminal_states() {
        assert!(AttemptState::Completed.is_terminal());
        assert!(AttemptState::Failed.is_terminal());
        assert!(!AttemptState::Answering.is_terminal());
    }
}
