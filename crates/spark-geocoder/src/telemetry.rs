//! 日志订阅器安装。
//!
//! # 契约说明（What）
//! - 组装 `fmt + EnvFilter`，过滤规则取自 `RUST_LOG`，缺省为 `info`；
//! - 日志写到标准错误，标准输出留给交互提示之外的数据；
//! - 外部已设置全局 Subscriber 时返回 [`TelemetryError::SubscriberAlreadySet`]，不覆盖。

use thiserror::Error;
use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

/// 安装日志订阅器时可能出现的错误。
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// 进程内已存在全局 Subscriber。
    #[error("全局 tracing Subscriber 已被设置")]
    SubscriberAlreadySet,
    /// 设置全局 Subscriber 失败。
    #[error("设置全局 tracing Subscriber 失败")]
    SetGlobalSubscriber(#[source] dispatcher::SetGlobalDefaultError),
}

/// 安装全局日志订阅器。
pub fn install() -> Result<(), TelemetryError> {
    if dispatcher::has_been_set() {
        return Err(TelemetryError::SubscriberAlreadySet);
    }

    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(TelemetryError::SetGlobalSubscriber)
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
