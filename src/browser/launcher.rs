//! 启动一个可见的浏览器窗口
//!
//! 登录需要人工完成，所以浏览器始终带界面启动，并使用独立的用户数据目录保存登录状态

use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::BrowserError;

/// 按配置启动浏览器并创建空白页面
pub async fn launch_browser(config: &Config) -> Result<(Browser, Page), BrowserError> {
    info!("🚀 启动浏览器...");
    debug!("用户数据目录: {}", config.browser_user_data_dir);

    let mut builder = BrowserConfig::builder()
        .with_head()
        .user_data_dir(&config.browser_user_data_dir)
        .args(vec![
            "--no-first-run",
            "--no-default-browser-check",
            "--disable-dev-shm-usage",
        ]);

    if let Some(executable) = &config.browser_executable {
        debug!("浏览器可执行文件: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        BrowserError::LaunchFailed(e)
    })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed(e.to_string())
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        BrowserError::PageCreationFailed(e)
    })?;

    Ok((browser, page))
}
