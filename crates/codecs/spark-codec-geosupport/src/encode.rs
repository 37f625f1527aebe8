//! 地址记录到工作区的编码。
//!
//! # 契约说明（What）
//! - 按 [`INPUT_FIELDS`] 的顺序把字面量、格式化后的字段值与空白填充写入 WA1；WA2 保持全空格。
//! - 字段内容从不校验：畸形门牌号或街道名原样以文本写入。超长值静默截断，截断的字段名记录在
//!   [`EncodedWorkAreas::truncated_fields`] 中。
//! - 只有布局表本身越界时才会失败；随 crate 发布的布局表由编译期断言保证不会触发。

use alloc::string::String;

use smallvec::SmallVec;

use crate::{
    borough::{Borough, UNKNOWN_BOROUGH},
    error::CodecError,
    format::format_field,
    layout::{BufferKind, INPUT_FIELDS, InputField, InputSource},
    work_area::WorkArea,
};

/// 编码输入：一条地址记录。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressRecord {
    /// 门牌号，例如 `123` 或 `42-10`。
    pub house_number: String,
    /// 行政区；`None` 在槽位中写入空白哨兵。
    pub borough: Option<Borough>,
    /// 街道名称。
    pub street_name: String,
    /// 邮政编码。
    pub zip_code: String,
}

impl AddressRecord {
    /// 构造地址记录。
    pub fn new(
        house_number: impl Into<String>,
        borough: Option<Borough>,
        street_name: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            house_number: house_number.into(),
            borough,
            street_name: street_name.into(),
            zip_code: zip_code.into(),
        }
    }

    /// 写入行政区槽位的字符。
    #[must_use]
    pub fn borough_char(&self) -> char {
        self.borough.map_or(UNKNOWN_BOROUGH, Borough::code_char)
    }
}

/// 截断字段名的内联容量，覆盖全部三个可变长输入字段。
pub const TRUNCATION_INLINE_CAPACITY: usize = 3;

/// 编码结果：两块可直接交给引擎的工作区，以及截断报告。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedWorkAreas {
    wa1: WorkArea,
    wa2: WorkArea,
    truncated: SmallVec<[&'static str; TRUNCATION_INLINE_CAPACITY]>,
}

impl EncodedWorkAreas {
    /// WA1。
    #[must_use]
    pub fn wa1(&self) -> &WorkArea {
        &self.wa1
    }

    /// WA2。
    #[must_use]
    pub fn wa2(&self) -> &WorkArea {
        &self.wa2
    }

    /// 同时借出两块工作区的可变引用，供引擎原地改写。
    pub fn work_areas_mut(&mut self) -> (&mut WorkArea, &mut WorkArea) {
        (&mut self.wa1, &mut self.wa2)
    }

    /// 编码时被截断的输入字段名，按布局顺序排列。
    #[must_use]
    pub fn truncated_fields(&self) -> &[&'static str] {
        &self.truncated
    }

    /// 是否所有输入值都完整写入。
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.truncated.is_empty()
    }

    /// 拆出 `(WA1, WA2)`。
    #[must_use]
    pub fn into_parts(self) -> (WorkArea, WorkArea) {
        (self.wa1, self.wa2)
    }
}

/// 将地址记录编码为函数 1B 的两块工作区。
///
/// ```
/// use spark_codec_geosupport::{AddressRecord, Borough, encode_address};
///
/// let record = AddressRecord::new("123", Some(Borough::Brooklyn), "main st", "11201");
/// let encoded = encode_address(&record).expect("内置布局表不会越界");
/// assert!(encoded.wa1().as_bytes().starts_with(b"1B123             "));
/// assert_eq!(encoded.wa1().as_bytes()[56], b'3');
/// ```
pub fn encode_address(record: &AddressRecord) -> Result<EncodedWorkAreas, CodecError> {
    let mut wa1 = WorkArea::blank(BufferKind::InputOutput);
    let mut truncated = SmallVec::new();

    for field in &INPUT_FIELDS {
        let slot = field.slot;
        match field.source {
            InputSource::Literal(literal) => wa1.write_text(field.name, slot, literal)?,
            InputSource::Filler => wa1.write_text(field.name, slot, "")?,
            InputSource::BoroughCode => {
                let mut code = [0u8; 4];
                let code = record.borough_char().encode_utf8(&mut code);
                wa1.write_text(field.name, slot, code)?;
            }
            InputSource::HouseNumber => {
                write_formatted(&mut wa1, field, &record.house_number, &mut truncated)?;
            }
            InputSource::StreetName => {
                write_formatted(&mut wa1, field, &record.street_name, &mut truncated)?;
            }
            InputSource::ZipCode => {
                write_formatted(&mut wa1, field, &record.zip_code, &mut truncated)?;
            }
        }
    }

    Ok(EncodedWorkAreas {
        wa1,
        wa2: WorkArea::blank(BufferKind::OutputOnly),
        truncated,
    })
}

fn write_formatted(
    wa1: &mut WorkArea,
    field: &InputField,
    value: &str,
    truncated: &mut SmallVec<[&'static str; TRUNCATION_INLINE_CAPACITY]>,
) -> Result<(), CodecError> {
    let formatted = format_field(value, field.slot.len());
    if formatted.is_truncated() {
        truncated.push(field.name);
    }
    wa1.write_text(field.name, field.slot, formatted.as_str())
}
