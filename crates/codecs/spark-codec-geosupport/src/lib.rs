#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # spark-codec-geosupport
//!
//! ## 教案目的（Why）
//! - **定位**：纽约市 Geosupport 地理编码引擎的定宽工作区编解码器。引擎通过两块固定长度、固定偏移的缓冲交换数据，
//!   本 crate 负责地址字段与缓冲之间的双向转换。
//! - **难点**：正确性完全取决于字节偏移、补齐/截断策略与一张较大的字段表；任何一个偏移错位都会无声地污染相邻字段，
//!   因此所有偏移集中在 [`layout`] 中声明，并以编译期断言与单元测试守护。
//!
//! ## 交互契约（What）
//! - [`encode_address`]：[`AddressRecord`] → 两块工作区（WA1 1200 字节、WA2 4300 字节），可直接交给引擎原地改写。
//! - [`decode_work_areas`]：引擎写回的两块缓冲 → 有序的 [`GeocodeResult`]。
//! - [`format_field`]：单字段定宽格式化；[`borough_code`]：行政区名称到代码的映射。
//! - 引擎调用本身不在本 crate 内，调用方负责持有引擎句柄并决定是否需要串行化访问。
//!
//! ## 实现策略（How）
//! - 编解码均为无状态纯函数，不做 I/O，不阻塞，可在多线程中并行调用。
//! - `no_std` 环境下需要 `alloc`；启用 `std` 时错误类型接入 `std::error::Error`，启用 `serde` 时结果可序列化。
//!
//! ## 风险提示（Trade-offs）
//! - 超长输入按槽位长度静默截断以保持与引擎一致的语义；截断信息通过
//!   [`EncodedWorkAreas::truncated_fields`] 暴露，不会真正丢弃。

extern crate alloc;

mod borough;
mod decode;
mod encode;
mod error;
mod format;
pub mod layout;
mod work_area;

pub use crate::{
    borough::{Borough, UNKNOWN_BOROUGH, borough_code},
    decode::{
        COMPOSITE_INLINE_CAPACITY, CompositeValue, GeocodeResult, GeocodeValue, decode_work_areas,
    },
    encode::{AddressRecord, EncodedWorkAreas, TRUNCATION_INLINE_CAPACITY, encode_address},
    error::CodecError,
    format::{FormattedField, format_field},
    layout::{BufferKind, FieldSlot, WA1_LEN, WA2_LEN},
    work_area::{REPLACEMENT_BYTE, WorkArea, latin1_to_string},
};

/// 工作区编解码器入口。
///
/// ### 设计意图（Why）
/// - 为需要以值形式注入编解码能力的调用方（例如批处理驱动）提供类型锚点；
///   布局表是编译期常量，因此结构体本身不携带任何状态。
///
/// ### 契约说明（What）
/// - [`WorkAreaCodec::encode`] 与 [`WorkAreaCodec::decode`] 分别等价于 [`encode_address`] 与 [`decode_work_areas`]。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkAreaCodec;

impl WorkAreaCodec {
    /// 构造编解码器。
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// 编码一条地址记录。
    pub fn encode(&self, record: &AddressRecord) -> Result<EncodedWorkAreas, CodecError> {
        encode_address(record)
    }

    /// 解码两块工作区。
    pub fn decode(&self, wa1: &[u8], wa2: &[u8]) -> Result<GeocodeResult, CodecError> {
        decode_work_areas(wa1, wa2)
    }

    /// 解码编码器产出（并经引擎改写）的工作区对。
    pub fn decode_encoded(&self, encoded: &EncodedWorkAreas) -> Result<GeocodeResult, CodecError> {
        decode_work_areas(encoded.wa1().as_bytes(), encoded.wa2().as_bytes())
    }
}
