//! 日志初始化
//!
//! `RUST_LOG` 优先；未设置时按 verbose 选择 debug 或 info

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// 安装全局 tracing subscriber，重复调用不会报错
pub fn init(verbose: bool) {
    let fallback = if verbose { "doc_quiz=debug" } else { "doc_quiz=info" };
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
