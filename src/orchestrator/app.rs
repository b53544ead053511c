//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：启动日志、连接或启动浏览器、等待人工登录
//! 2. **组装依赖**：ExamPage、AnswerOracle、QuestionFlow、RunLoop
//! 3. **资源管理**：持有 Browser 和 ExamPage，确保生命周期正确
//! 4. **全局统计**：输出所有场次的结果

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Browser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::browser;
use crate::config::Config;
use crate::error::SessionError;
use crate::infrastructure::{ExamPage, JsExecutor, TokioSleeper};
use crate::models::SessionOutcome;
use crate::orchestrator::quiz_session::QuizSession;
use crate::orchestrator::run_loop::{AttemptRunner, RunLoop};
use crate::services::{AnswerOracle, AuditWriter, FallbackSelector};
use crate::utils::logging::{self, log_startup, print_final_stats};
use crate::workflow::QuestionFlow;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    page: ExamPage,
    flow: QuestionFlow,
    run_loop: RunLoop,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init(&config)?;
        log_startup(&config);

        let (browser, page) = browser::open_browser(&config).await?;
        let executor = JsExecutor::new(page);

        executor.goto(&config.login_url).await?;
        wait_for_login().await?;

        let page = ExamPage::new(executor, &config);

        let fallback = Arc::new(FallbackSelector::new());
        let oracle = AnswerOracle::from_config(&config, fallback.clone());
        let audit = config.audit_file.as_deref().map(AuditWriter::with_path);
        let flow = QuestionFlow::new(oracle, fallback, audit);

        let run_loop = RunLoop::new(
            config.attempts,
            config.attempt_delay(),
            config.failure_cooldown(),
            Arc::new(TokioSleeper),
        );

        Ok(Self {
            config,
            _browser: browser,
            page,
            flow,
            run_loop,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let mut runner = ExamAttemptRunner {
            page: &self.page,
            flow: &self.flow,
            question_count: self.config.question_count,
        };

        let summary = self.run_loop.run(&mut runner).await;
        print_final_stats(&summary, &self.config.output_log_file);

        Ok(())
    }
}

/// 在真实考试页面上跑一场
struct ExamAttemptRunner<'a> {
    page: &'a ExamPage,
    flow: &'a QuestionFlow,
    question_count: usize,
}

#[async_trait]
impl AttemptRunner for ExamAttemptRunner<'_> {
    async fn run_attempt(&mut self, attempt: u32) -> Result<SessionOutcome, SessionError> {
        let mut session =
            QuizSession::new(attempt, self.question_count, self.page, self.page, self.flow);
        session.run().await
    }
}

/// 等待用户在浏览器里手动登录后按回车
async fn wait_for_login() -> Result<()> {
    info!("🔐 请在浏览器中完成登录，完成后回到此处按 Enter 继续...");

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("读取终端输入失败")?;

    info!("✓ 已确认登录，开始答题");
    Ok(())
}
