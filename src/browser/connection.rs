//! 连接到已开启远程调试端口的浏览器

use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 连接到浏览器并取得一个页面
///
/// 优先复用浏览器里已经打开的第一个页面（通常是用户手动登录过的那个），
/// 没有页面时新建空白页
pub async fn connect_to_browser_and_page(port: u16) -> Result<(Browser, Page), BrowserError> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|source| {
        error!("连接浏览器失败: {}", source);
        BrowserError::ConnectionFailed { port, source }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await.map_err(BrowserError::PageCreationFailed)?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(page) = pages.into_iter().next() {
        if let Ok(Some(title)) = page.get_title().await {
            info!("✓ 复用已打开的页面: {}", title);
        }
        return Ok((browser, page));
    }

    debug!("没有已打开的页面，创建空白页面");
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建空白页面失败: {}", e);
        BrowserError::PageCreationFailed(e)
    })?;

    Ok((browser, page))
}
