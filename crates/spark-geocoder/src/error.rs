//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 批处理链路横跨文件 I/O、CSV 解析、配置加载、交互提示、编解码与原生引擎调用，
//!   本模块把这些失败集中为 [`GeocoderError`]，让二进制入口只需处理一个错误域。
//! - 引擎失败单独定义为 [`EngineError`]，便于引擎实现方在不依赖批处理细节的情况下返回错误。
//!
//! ## 设计要求（What）
//! - 所有错误派生 `thiserror::Error`，底层错误通过 `#[source]` 保留错误链；
//! - 与行相关的失败携带行号（CSV 数据行从 1 开始计数，不含表头）。

use std::{io, path::PathBuf};

use spark_codec_geosupport::{BufferKind, CodecError};
use thiserror::Error;

/// 引擎调用失败。
#[derive(Debug, Error)]
pub enum EngineError {
    /// 传入的工作区类型与参数位置不符，例如把 WA2 当作 WA1 传入。
    #[error("参数位置期望 {expected}，实际收到 {actual}")]
    WrongBuffer {
        /// 期望的缓冲类型。
        expected: BufferKind,
        /// 实际收到的缓冲类型。
        actual: BufferKind,
    },
    /// 引擎在当前构建或运行环境中不可用。
    #[error("引擎 `{engine}` 不可用：{reason}")]
    Unavailable {
        /// 引擎名称。
        engine: &'static str,
        /// 不可用原因。
        reason: String,
    },
    /// 引擎返回了无法继续处理的结果。
    #[error("引擎调用失败：{detail}")]
    Failed {
        /// 人类可读的说明。
        detail: String,
    },
}

/// 批量地理编码错误域。
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// 打开、创建或读取文件失败。
    #[error("无法访问 `{}`", .path.display())]
    Io {
        /// 相关文件路径。
        path: PathBuf,
        /// 底层 I/O 错误。
        #[source]
        source: io::Error,
    },
    /// CSV 读写失败。
    #[error("CSV 读写失败")]
    Csv(#[from] csv::Error),
    /// 配置文件不是合法的 TOML 或包含未知字段。
    #[error("配置解析失败")]
    Config(#[from] toml::de::Error),
    /// 配置缺少必需项，且无法通过交互补齐。
    #[error("缺少配置项 `{0}`")]
    MissingSetting(&'static str),
    /// 分隔符必须是单个 ASCII 字符。
    #[error("分隔符 `{0}` 不是单字节 ASCII 字符")]
    InvalidDelimiter(char),
    /// 输入表头中找不到配置的列。
    #[error("输入缺少列 `{column}`，可用列：{available:?}")]
    MissingColumn {
        /// 配置的列名。
        column: String,
        /// 输入表头中的全部列名。
        available: Vec<String>,
    },
    /// 交互提示读取失败。
    #[error("读取交互输入失败：{0}")]
    Prompt(String),
    /// 工作区编解码违反布局契约。
    #[error("第 {row} 行编解码失败")]
    Codec {
        /// 数据行号。
        row: u64,
        /// 编解码错误。
        #[source]
        source: CodecError,
    },
    /// 引擎调用失败，批处理在该行终止。
    #[error("第 {row} 行调用引擎失败")]
    Engine {
        /// 数据行号。
        row: u64,
        /// 引擎错误。
        #[source]
        source: EngineError,
    },
}

impl GeocoderError {
    /// 构造带路径的 I/O 错误。
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
