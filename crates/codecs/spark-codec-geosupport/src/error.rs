//! Geosupport 工作区编解码错误类型。
//!
//! # 教案定位（Why）
//! - 编解码过程中唯一会失败的情形是“布局契约被破坏”：输入缓冲长度不足，或字段槽位越出缓冲边界，两者同为 [`CodecError::LayoutViolation`]。
//! - 未知行政区与字段截断均不属于错误，分别由空白哨兵与截断标记表达，详见 `borough` 与 `format` 模块。
//!
//! # 使用契约（What）
//! - `CodecError` 的每个分支都携带足以定位问题的长度信息，调用方无需再次测量缓冲。
//! - 启用 `std` 时派生 `thiserror::Error`；`no_std` 环境下手写 `Display`，两者输出文案一致。

use core::fmt;

#[cfg(feature = "std")]
use thiserror::Error;

use crate::layout::BufferKind;

/// 编解码阶段可能出现的布局违规。
///
/// ## 契约定义（What）
/// - 所有变体都表示调用方提供的缓冲或布局表不满足固定宽度契约，结果不可用；
/// - 解码前即完成长度校验，因此错误返回时不会读取任何越界或截断的数据。
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// 布局契约被破坏：解码时缓冲短于输出表要求的最大偏移，或编码时某个槽位越出所在缓冲。
    ///
    /// `field` 为 `None` 表示整张输出表的长度要求；为 `Some` 时指出越界的字段，属于布局表本身的缺陷。
    #[cfg_attr(
        feature = "std",
        error(
            "{buffer} 长度 {actual} 不足，{} 至少需要 {required} 字节",
            .field.unwrap_or("输出布局")
        )
    )]
    LayoutViolation {
        /// 违规的缓冲类型。
        buffer: BufferKind,
        /// 越界的字段名；长度校验失败时为 `None`。
        field: Option<&'static str>,
        /// 所需的最小长度（槽位结束偏移，溢出时饱和为 `usize::MAX`）。
        required: usize,
        /// 实际提供的长度。
        actual: usize,
    },
    /// 工作区长度与缓冲类型的固定长度不一致。
    #[cfg_attr(
        feature = "std",
        error("{buffer} 必须恰好为 {expected} 字节，实际为 {actual} 字节")
    )]
    LengthMismatch {
        /// 期望的缓冲类型。
        buffer: BufferKind,
        /// 固定长度。
        expected: usize,
        /// 实际长度。
        actual: usize,
    },
}

impl CodecError {
    /// 返回违规涉及的缓冲类型。
    #[must_use]
    pub const fn buffer(&self) -> BufferKind {
        match self {
            Self::LayoutViolation { buffer, .. } | Self::LengthMismatch { buffer, .. } => *buffer,
        }
    }
}

#[cfg(not(feature = "std"))]
impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayoutViolation {
                buffer,
                field,
                required,
                actual,
            } => write!(
                f,
                "{buffer} 长度 {actual} 不足，{} 至少需要 {required} 字节",
                field.unwrap_or("输出布局")
            ),
            Self::LengthMismatch {
                buffer,
                expected,
                actual,
            } => write!(
                f,
                "{buffer} 必须恰好为 {expected} 字节，实际为 {actual} 字节"
            ),
        }
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
