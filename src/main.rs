use anyhow::Result;
use quiz_autoanswer::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（默认值 → quiz.toml → 环境变量）
    let config = Config::load()?;

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
