//! 作答记录服务 - 业务能力层
//!
//! 只负责把随机作答和失败的题目追加到记录文件，方便人工核查哪些答案是猜的

use std::path::PathBuf;

use anyhow::Result;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 作答记录服务
///
/// 职责：
/// - 追加写入单条记录
/// - 不关心流程顺序
pub struct AuditWriter {
    path: PathBuf,
}

impl AuditWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// 写入一条记录
    ///
    /// # 参数
    /// - `attempt`: 第几场
    /// - `ordinal`: 题号
    /// - `kind`: 记录类型（随机作答 / 提取失败 / 点击失败）
    /// - `detail`: 详情
    pub async fn write(&self, attempt: u32, ordinal: usize, kind: &str, detail: &str) -> Result<()> {
        debug!(
            "写入记录: 第 {} 场 | 第 {} 题 | {} | 详情长度: {}",
            attempt,
            ordinal,
            kind,
            detail.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let line = format!(
            "{} | 第 {} 场 | 第 {} 题 | {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            attempt,
            ordinal,
            kind,
            detail.replace('\n', " ")
        );

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
