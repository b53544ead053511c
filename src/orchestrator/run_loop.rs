//! 多场答题循环 - 编排层
//!
//! 连续跑 `attempts` 场，每场之间等待：
//! - 成功后等待 `delay`
//! - 失败或 panic 后冷却 `failure_cooldown`
//! - 最后一场结束后不再等待
//!
//! 单场 panic 被捕获，不影响后续场次

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{error, info, warn};

use crate::error::SessionError;
use crate::infrastructure::Sleeper;
use crate::models::{RunSummary, SessionOutcome};
use crate::utils::logging::{log_attempt_complete, log_attempt_start};

/// 执行单场答题
#[async_trait]
pub trait AttemptRunner: Send {
    async fn run_attempt(&mut self, attempt: u32) -> Result<SessionOutcome, SessionError>;
}

/// 多场答题循环
pub struct RunLoop {
    attempts: u32,
    delay: Duration,
    failure_cooldown: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl RunLoop {
    pub fn new(attempts: u32, delay: Duration, failure_cooldown: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            attempts,
            delay,
            failure_cooldown,
            sleeper,
        }
    }

    /// 依次跑完所有场次并汇总
    pub async fn run<R: AttemptRunner>(&self, runner: &mut R) -> RunSummary {
        let mut summary = RunSummary {
            total: self.attempts,
            ..Default::default()
        };

        for attempt in 1..=self.attempts {
            log_attempt_start(attempt, self.attempts);

            let result = AssertUnwindSafe(runner.run_attempt(attempt))
                .catch_unwind()
                .await;

            let succeeded = match result {
                Ok(Ok(outcome)) => {
                    log_attempt_complete(&outcome);
                    true
                }
                Ok(Err(e)) => {
                    error!("[第 {} 场] ❌ 失败: {}", attempt, e);
                    false
                }
                Err(panic) => {
                    error!("[第 {} 场] 💥 异常终止: {}", attempt, panic_message(&*panic));
                    false
                }
            };

            if succeeded {
                summary.completed += 1;
            } else {
                summary.failed += 1;
            }

            if attempt == self.attempts {
                break;
            }

            if succeeded {
                info!("⏳ 等待 {:?} 后开始下一场", self.delay);
                self.sleeper.sleep(self.delay).await;
            } else {
                warn!("⏳ 冷却 {:?} 后重试", self.failure_cooldown);
                self.sleeper.sleep(self.failure_cooldown).await;
            }
        }

        summary
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "未知错误".to_string()
    }
}
