//! 题目处理上下文
//!
//! 封装"我正在处理第几场的第几题"这一信息

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCtx {
    /// 第几场（从1开始）
    pub attempt: u32,

    /// 题号（从1开始）
    pub ordinal: usize,

    /// 本场题目总数（仅用于日志显示）
    pub total: usize,
}

impl QuestionCtx {
    pub fn new(attempt: u32, ordinal: usize, total: usize) -> Self {
        Self {
            attempt,
            ordinal,
            total,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[第 {} 场 题目 {}/{}]",
            self.attempt, self.ordinal, self.total
        )
    }
}
