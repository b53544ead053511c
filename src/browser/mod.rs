mod connection;
mod launcher;

pub use connection::connect_to_browser_and_page;
pub use launcher::launch_browser;

use chromiumoxide::{Browser, Page};

use crate::config::Config;
use crate::error::BrowserError;

/// 有调试端口时连接已有浏览器，否则启动新的浏览器
pub async fn open_browser(config: &Config) -> Result<(Browser, Page), BrowserError> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port).await,
        None => launch_browser(config).await,
    }
}
