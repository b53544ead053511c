//! 日志工具模块
//!
//! 日志同时输出到终端和日志文件，另外提供格式化输出的辅助函数

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::models::{RunSummary, SessionOutcome};

/// 初始化日志
///
/// - 终端：带颜色
/// - 文件：`output_log_file`，每次启动覆盖并写入表头
/// - 级别：`RUST_LOG` 优先，否则 `verbose_logging` 决定 debug / info
pub fn init(config: &Config) -> Result<()> {
    init_log_file(&config.output_log_file)?;

    let file = OpenOptions::new()
        .append(true)
        .open(&config.output_log_file)
        .with_context(|| format!("打开日志文件 {} 失败", config.output_log_file))?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("初始化日志失败")?;

    Ok(())
}

/// 初始化日志文件
fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n自动答题日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("写入日志文件 {} 失败", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 自动答题模式");
    info!("📊 计划场数: {}，每场 {} 题", config.attempts, config.question_count);
    info!("🤖 模型: {} ({:?})", config.model_name(), config.llm_backend);
    info!("{}", "=".repeat(60));
}

/// 记录单场开始
pub fn log_attempt_start(attempt: u32, total: u32) {
    info!("\n{}", "=".repeat(60));
    info!("📝 开始第 {}/{} 场", attempt, total);
    info!("{}", "=".repeat(60));
}

/// 记录单场结果
pub fn log_attempt_complete(outcome: &SessionOutcome) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 场{}: 作答 {}/{}，随机 {}，提取失败 {}，点击失败 {}",
        outcome.attempt,
        outcome.state,
        outcome.answered_count(),
        outcome.outcomes.len(),
        outcome.guessed_count(),
        outcome.extraction_failures(),
        outcome.activation_failures()
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部答题完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", summary.completed, summary.total);
    info!("❌ 失败: {}", summary.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("资讯安全", 2), "资讯...");
        assert_eq!(truncate_text("短", 5), "短");
    }

    #[test]
    fn test_log_file_header() {
        let path = std::env::temp_dir().join(format!("quiz_log_{}.txt", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        init_log_file(&path_str).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("自动答题日志"));

        let _ = fs::remove_file(&path);
    }
}
