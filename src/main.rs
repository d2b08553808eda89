use std::path::PathBuf;

use anyhow::{bail, Result};
use doc_quiz::config::Config;
use doc_quiz::logger;
use doc_quiz::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("用法: doc_quiz <文件1> [文件2 ...]");
    }

    // 初始化并运行应用
    App::initialize(config, &paths).await?.run().await?;

    Ok(())
}
