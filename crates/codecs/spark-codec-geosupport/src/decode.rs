//! 工作区到结构化结果的解码。
//!
//! # 教案定位（Why）
//! - 引擎写回的两块工作区只是定宽字节；解码按 [`OUTPUT_FIELDS`] 逐项切片、裁剪空白，组装成有序的具名结果。
//! - 解码是纯函数：相同输入永远得到相同结果，不持有任何隐藏状态。
//!
//! # 契约说明（What）
//! - 读取任何切片之前先校验两块缓冲的长度是否达到 [`WA1_REQUIRED_LEN`]/[`WA2_REQUIRED_LEN`]，
//!   不足时返回 [`CodecError::LayoutViolation`]，绝不返回截断或越界数据。
//! - 每个值都是对应字节区间去掉首尾 ASCII 空白后的文本，不做任何类型转换；数值解析由调用方负责。
//! - 组合字段解码为有序的子字段映射，同时保留覆盖全部子槽位的原始文本（[`CompositeValue::source`]），
//!   供需要“整组一列”输出的调用方使用。

use alloc::{borrow::Cow, string::String, vec::Vec};

use smallvec::SmallVec;

use crate::{
    error::CodecError,
    layout::{
        BufferKind, OUTPUT_FIELDS, OutputShape, WA1_REQUIRED_LEN, WA2_REQUIRED_LEN,
    },
    work_area::latin1_to_string,
};

/// 组合字段子项的内联容量，覆盖最大的坐标组（6 项）。
pub const COMPOSITE_INLINE_CAPACITY: usize = 6;

/// 组合字段的解码值。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeValue {
    source: String,
    parts: SmallVec<[(&'static str, String); COMPOSITE_INLINE_CAPACITY]>,
}

impl CompositeValue {
    /// 按子字段名取值。
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|(part, _)| *part == name)
            .map(|(_, value)| value.as_str())
    }

    /// 按布局顺序遍历子字段。
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.parts.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// 子字段数量。
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// 是否没有子字段。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// 整组的原始表示：各子槽位原样拼接后去掉首尾空白，例如 BBL 的 `3012340056`。
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// 单个输出字段的解码值。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeocodeValue {
    /// 裁剪后的文本。
    Text(String),
    /// 组合字段。
    Composite(CompositeValue),
}

impl GeocodeValue {
    /// 文本值；组合字段返回 `None`。
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Composite(_) => None,
        }
    }

    /// 组合值；文本字段返回 `None`。
    #[must_use]
    pub fn as_composite(&self) -> Option<&CompositeValue> {
        match self {
            Self::Text(_) => None,
            Self::Composite(composite) => Some(composite),
        }
    }

    /// 作为单列输出时的文本：文本字段即其值，组合字段为整组原始表示。
    #[must_use]
    pub fn to_column_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Composite(composite) => Cow::Borrowed(composite.source()),
        }
    }
}

/// 一次解码的有序结果，字段顺序与 [`OUTPUT_FIELDS`] 一致。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeocodeResult {
    entries: Vec<(&'static str, GeocodeValue)>,
}

impl GeocodeResult {
    /// 按字段名取值。
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GeocodeValue> {
        self.entries
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// 按字段名取文本值。
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(GeocodeValue::as_text)
    }

    /// 按字段名取组合值。
    #[must_use]
    pub fn composite(&self, name: &str) -> Option<&CompositeValue> {
        self.get(name).and_then(GeocodeValue::as_composite)
    }

    /// 按布局顺序遍历。
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &GeocodeValue)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// 字段数量。
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 解码两块工作区。
///
/// # 调用契约（What）
/// - **输入**：`wa1`/`wa2` 为引擎写回的原始字节，长度至少为输出表在各自缓冲上的最大结束偏移；
///   通常即完整的 1200/4300 字节工作区。
/// - **输出**：34 个具名字段的有序结果；组合字段为嵌套映射。
/// - **失败**：仅在缓冲过短时返回 [`CodecError::LayoutViolation`]，先检查 WA1 再检查 WA2。
pub fn decode_work_areas(wa1: &[u8], wa2: &[u8]) -> Result<GeocodeResult, CodecError> {
    ensure_len(BufferKind::InputOutput, wa1, WA1_REQUIRED_LEN)?;
    ensure_len(BufferKind::OutputOnly, wa2, WA2_REQUIRED_LEN)?;

    let mut entries = Vec::with_capacity(OUTPUT_FIELDS.len());
    for field in &OUTPUT_FIELDS {
        let buffer = match field.buffer {
            BufferKind::InputOutput => wa1,
            BufferKind::OutputOnly => wa2,
        };
        let value = match field.shape {
            OutputShape::Single(slot) => GeocodeValue::Text(trimmed(&buffer[slot.range()])),
            OutputShape::Composite(parts) => {
                let mut raw = String::new();
                let mut values = SmallVec::new();
                for part in parts {
                    let bytes = &buffer[part.slot.range()];
                    raw.push_str(&latin1_to_string(bytes));
                    values.push((part.name, trimmed(bytes)));
                }
                GeocodeValue::Composite(CompositeValue {
                    source: trim_ascii_whitespace(&raw).into(),
                    parts: values,
                })
            }
        };
        entries.push((field.name, value));
    }

    Ok(GeocodeResult { entries })
}

fn ensure_len(buffer: BufferKind, bytes: &[u8], required: usize) -> Result<(), CodecError> {
    if bytes.len() < required {
        return Err(CodecError::LayoutViolation {
            buffer,
            field: None,
            required,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn trimmed(bytes: &[u8]) -> String {
    latin1_to_string(bytes.trim_ascii())
}

fn trim_ascii_whitespace(text: &str) -> &str {
    text.trim_matches(|ch: char| ch.is_ascii_whitespace())
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::ser::{Serialize, SerializeMap, Serializer};

    use super::{CompositeValue, GeocodeResult, GeocodeValue};

    impl Serialize for CompositeValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (name, value) in self.iter() {
                map.serialize_entry(name, value)?;
            }
            map.end()
        }
    }

    impl Serialize for GeocodeValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Text(text) => serializer.serialize_str(text),
                Self::Composite(composite) => composite.serialize(serializer),
            }
        }
    }

    impl Serialize for GeocodeResult {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (name, value) in self.iter() {
                map.serialize_entry(name, value)?;
            }
            map.end()
        }
    }
}
