//! Geosupport 工作区的固定偏移布局表。
//!
//! # 教案定位（Why）
//! - 工作区是纯位置记录：字段含义完全由字节偏移与长度决定，任何一个偏移错位都会静默污染相邻字段。
//! - 本模块把所有偏移集中声明为常量表，作为编码与解码唯一的事实来源，可脱离外部引擎独立测试。
//!
//! # 契约说明（What）
//! - WA1（[`BufferKind::InputOutput`]，1200 字节）既是调用输入，也承载部分输出；
//!   WA2（[`BufferKind::OutputOnly`]，4300 字节）仅作输出。
//! - [`INPUT_FIELDS`] 按顺序拼接即得到引擎期望的 `1B` 事务前缀布局；
//!   [`OUTPUT_FIELDS`] 描述解码结果的字段名、所在缓冲与槽位，顺序即结果顺序。
//! - 偏移均为 0 起始、结束开区间。引擎手册从 1 开始计数，录入时已换算。
//!
//! # 实现策略（How）
//! - 表以 `const` 声明，配合 `const fn` 在编译期求出每个缓冲的最小解码长度，并以
//!   `const` 断言守住“槽位不越界”“输入字段首尾相接”两条不变量。
//!
//! ```text
//! WA1 input:
//! +----+------------------+---------+---+----------+------------------+---------+---+-------+
//! | 1B | house number(16) | fill 38 | B | fill 10  | street name (32) | fill113 | C | zip 5 |
//! +----+------------------+---------+---+----------+------------------+---------+---+-------+
//! 0    2                  18        56  57         67                 99        212 213     218
//! ```

use core::ops::Range;

/// WA1 的固定长度。
pub const WA1_LEN: usize = 1200;
/// WA2 的固定长度。
pub const WA2_LEN: usize = 4300;

/// 工作区缓冲类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BufferKind {
    /// WA1：输入兼输出。
    InputOutput,
    /// WA2：仅输出。
    OutputOnly,
}

impl BufferKind {
    /// 缓冲的固定总长度。
    #[must_use]
    pub const fn fixed_len(self) -> usize {
        match self {
            Self::InputOutput => WA1_LEN,
            Self::OutputOnly => WA2_LEN,
        }
    }

    /// 引擎手册中的简称。
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InputOutput => "WA1",
            Self::OutputOnly => "WA2",
        }
    }
}

/// 缓冲中的一个定址区间 `(offset, len)`。
///
/// - **Contract**：`offset + len` 不得超过所在缓冲的固定长度；同一缓冲内的槽位互不重叠，
///   组合字段的子槽位只嵌套在父字段内部。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSlot {
    offset: usize,
    len: usize,
}

impl FieldSlot {
    /// 以起始偏移与长度构造槽位。
    #[must_use]
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// 以 `[start, end)` 区间构造槽位，与手册中的区间写法对应。
    ///
    /// `end < start` 的区间在常量求值时直接报错，不会进入布局表。
    #[must_use]
    pub const fn span(start: usize, end: usize) -> Self {
        assert!(start <= end, "field slot end precedes its start");
        Self::new(start, end - start)
    }

    /// 单字节槽位。
    #[must_use]
    pub const fn byte(offset: usize) -> Self {
        Self::new(offset, 1)
    }

    /// 起始偏移。
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// 槽位长度。
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// 是否为空槽位。
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 结束偏移（开区间），溢出时饱和为 `usize::MAX`。
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset.saturating_add(self.len)
    }

    /// 对应的切片区间。
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// 槽位是否完整落在长度为 `buffer_len` 的缓冲内。
    #[must_use]
    pub const fn fits(&self, buffer_len: usize) -> bool {
        match self.offset.checked_add(self.len) {
            Some(end) => end <= buffer_len,
            None => false,
        }
    }

    /// 两个槽位是否存在重叠字节。
    #[must_use]
    pub const fn overlaps(&self, other: &FieldSlot) -> bool {
        !self.is_empty() && !other.is_empty() && self.offset < other.end() && other.offset < self.end()
    }
}

/// 输入字段的取值来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// 固定字面量，例如事务码 `1B`。
    Literal(&'static str),
    /// 空白填充。
    Filler,
    /// 门牌号。
    HouseNumber,
    /// 行政区代码（单字符，未知时为空白哨兵）。
    BoroughCode,
    /// 街道名称。
    StreetName,
    /// 邮政编码。
    ZipCode,
}

/// WA1 中的一个输入字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    /// 语义名称。
    pub name: &'static str,
    /// 在 WA1 中的槽位。
    pub slot: FieldSlot,
    /// 取值来源。
    pub source: InputSource,
}

/// 函数 1B 的事务码。
pub const TRANSACTION_CODE: &str = "1B";
/// 输入区段码。
pub const SECTION_CODE: &str = "C";

/// 事务码槽位。
pub const TRANSACTION_CODE_SLOT: FieldSlot = FieldSlot::new(0, 2);
/// 门牌号槽位。
pub const HOUSE_NUMBER_SLOT: FieldSlot = FieldSlot::new(2, 16);
/// 行政区代码槽位。
pub const BOROUGH_CODE_SLOT: FieldSlot = FieldSlot::new(56, 1);
/// 街道名称槽位。
pub const STREET_NAME_SLOT: FieldSlot = FieldSlot::new(67, 32);
/// 区段码槽位。
pub const SECTION_CODE_SLOT: FieldSlot = FieldSlot::new(212, 1);
/// 邮政编码槽位。
pub const ZIP_CODE_SLOT: FieldSlot = FieldSlot::new(213, 5);

/// WA1 输入布局，按偏移顺序排列且首尾相接。
pub const INPUT_FIELDS: [InputField; 9] = [
    InputField {
        name: "transaction code",
        slot: TRANSACTION_CODE_SLOT,
        source: InputSource::Literal(TRANSACTION_CODE),
    },
    InputField {
        name: "house number",
        slot: HOUSE_NUMBER_SLOT,
        source: InputSource::HouseNumber,
    },
    InputField {
        name: "filler",
        slot: FieldSlot::new(18, 38),
        source: InputSource::Filler,
    },
    InputField {
        name: "borough code",
        slot: BOROUGH_CODE_SLOT,
        source: InputSource::BoroughCode,
    },
    InputField {
        name: "filler",
        slot: FieldSlot::new(57, 10),
        source: InputSource::Filler,
    },
    InputField {
        name: "street name",
        slot: STREET_NAME_SLOT,
        source: InputSource::StreetName,
    },
    InputField {
        name: "filler",
        slot: FieldSlot::new(99, 113),
        source: InputSource::Filler,
    },
    InputField {
        name: "section code",
        slot: SECTION_CODE_SLOT,
        source: InputSource::Literal(SECTION_CODE),
    },
    InputField {
        name: "zip code",
        slot: ZIP_CODE_SLOT,
        source: InputSource::ZipCode,
    },
];

/// 输出字段名称常量，即解码结果与输出列的键。
pub mod names {
    #![allow(missing_docs)]

    pub const FIRST_BOROUGH_NAME: &str = "First Borough Name";
    pub const HOUSE_NUMBER_DISPLAY: &str = "House Number Display Format";
    pub const HOUSE_NUMBER_SORT: &str = "House Number Sort Format";
    pub const B10SC: &str = "B10SC First Borough and Street Code";
    pub const SECOND_STREET_NAME: &str = "Second Street Name Normalized";
    pub const COMMUNITY_DISTRICT: &str = "Community District";
    pub const ZIP_CODE: &str = "Zip Code";
    pub const ELECTION_DISTRICT: &str = "Election District";
    pub const ASSEMBLY_DISTRICT: &str = "Assembly District";
    pub const CONGRESSIONAL_DISTRICT: &str = "Congressional District";
    pub const STATE_SENATORIAL_DISTRICT: &str = "State Senatorial District";
    pub const CITY_COUNCIL_DISTRICT: &str = "City Council District";
    pub const POLICE_PRECINCT: &str = "Police Precinct";
    pub const COMMUNITY_SCHOOL_DISTRICT: &str = "Community School District";
    pub const ATOMIC_POLYGON: &str = "Atomic Polygon";
    pub const CENSUS_TRACT_2010: &str = "2010 Census Tract";
    pub const CENSUS_BLOCK_2010: &str = "2010 Census Block";
    pub const CENSUS_BLOCK_SUFFIX_2010: &str = "2010 Census Block Suffix";
    pub const NTA: &str = "Neighborhood Tabulation Area (NTA)";
    pub const DSNY_SNOW_PRIORITY: &str = "DSNY Snow Priority Code";
    pub const HURRICANE_EVACUATION_ZONE: &str = "Hurricane Evacuation Zone (HEZ)";
    pub const SEGMENT_COORDINATES: &str = "Spatial Coordinates of Segment";
    pub const ROADWAY_TYPE: &str = "Roadway Type";
    pub const BIKE_LANE: &str = "Bike Lane";
    pub const NTA_NAME: &str = "NTA Name";
    pub const USPS_CITY_NAME: &str = "USPS Preferred City Name";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const BBL: &str = "Borough Block Lot (BBL)";
    pub const BIN: &str = "Building Identification Number (BIN) of Input Address or NAP";
    pub const LOT_CENTROID: &str = "X-Y Coordinates of Lot Centroid";
    pub const SPATIAL_X: &str = "Spatial X";
    pub const SPATIAL_Y: &str = "Spatial Y";
    pub const MESSAGE: &str = "Message";

    pub const X_LOW: &str = "X Coordinate, Low Address End";
    pub const Y_LOW: &str = "Y Coordinate, Low Address End";
    pub const Z_LOW: &str = "Z Coordinate, Low Address End";
    pub const X_HIGH: &str = "X Coordinate, High Address End";
    pub const Y_HIGH: &str = "Y Coordinate, High Address End";
    pub const Z_HIGH: &str = "Z Coordinate, High Address End";

    pub const BBL_BOROUGH: &str = "Borough code";
    pub const TAX_BLOCK: &str = "Tax Block";
    pub const TAX_LOT: &str = "Tax Lot";
}

/// 组合字段中的子字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubField {
    /// 子字段名称。
    pub name: &'static str,
    /// 在父缓冲中的槽位。
    pub slot: FieldSlot,
}

/// 输出字段的形态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// 单一槽位。
    Single(FieldSlot),
    /// 组合字段：有序的子字段集合，全部位于同一父缓冲。
    Composite(&'static [SubField]),
}

/// 解码表中的一项。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputField {
    /// 字段名称。
    pub name: &'static str,
    /// 所在缓冲。
    pub buffer: BufferKind,
    /// 槽位形态。
    pub shape: OutputShape,
}

impl OutputField {
    const fn single(name: &'static str, buffer: BufferKind, slot: FieldSlot) -> Self {
        Self {
            name,
            buffer,
            shape: OutputShape::Single(slot),
        }
    }

    const fn composite(name: &'static str, buffer: BufferKind, parts: &'static [SubField]) -> Self {
        Self {
            name,
            buffer,
            shape: OutputShape::Composite(parts),
        }
    }

    /// 该字段涉及的最大结束偏移。
    #[must_use]
    pub const fn max_end(&self) -> usize {
        match self.shape {
            OutputShape::Single(slot) => slot.end(),
            OutputShape::Composite(parts) => {
                let mut max = 0;
                let mut i = 0;
                while i < parts.len() {
                    if parts[i].slot.end() > max {
                        max = parts[i].slot.end();
                    }
                    i += 1;
                }
                max
            }
        }
    }

    /// 覆盖全部子槽位的最小区间；单一槽位即其自身。
    #[must_use]
    pub const fn extent(&self) -> FieldSlot {
        match self.shape {
            OutputShape::Single(slot) => slot,
            OutputShape::Composite(parts) => {
                let mut min = usize::MAX;
                let mut i = 0;
                while i < parts.len() {
                    if parts[i].slot.offset() < min {
                        min = parts[i].slot.offset();
                    }
                    i += 1;
                }
                if parts.is_empty() {
                    FieldSlot::new(0, 0)
                } else {
                    FieldSlot::span(min, self.max_end())
                }
            }
        }
    }

    /// 是否为组合字段。
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self.shape, OutputShape::Composite(_))
    }
}

use BufferKind::{InputOutput as Wa1, OutputOnly as Wa2};

const SEGMENT_COORDINATE_PARTS: [SubField; 6] = [
    SubField {
        name: names::X_LOW,
        slot: FieldSlot::span(313, 320),
    },
    SubField {
        name: names::Y_LOW,
        slot: FieldSlot::span(320, 327),
    },
    SubField {
        name: names::Z_LOW,
        slot: FieldSlot::span(327, 334),
    },
    SubField {
        name: names::X_HIGH,
        slot: FieldSlot::span(334, 341),
    },
    SubField {
        name: names::Y_HIGH,
        slot: FieldSlot::span(341, 348),
    },
    SubField {
        name: names::Z_HIGH,
        slot: FieldSlot::span(348, 355),
    },
];

const BBL_PARTS: [SubField; 3] = [
    SubField {
        name: names::BBL_BOROUGH,
        slot: FieldSlot::byte(1533),
    },
    SubField {
        name: names::TAX_BLOCK,
        slot: FieldSlot::span(1534, 1539),
    },
    SubField {
        name: names::TAX_LOT,
        slot: FieldSlot::span(1539, 1543),
    },
];

/// 输出字段数量。
pub const OUTPUT_FIELD_COUNT: usize = 34;

/// 规范输出表（verbose 布局）。顺序即解码结果的顺序。
///
/// 街道代码 B10SC 采用 396..407（11 字节）；另一份紧凑表中 `395..11` 的区间起点大于终点，
/// 属于缺陷，不予采纳。
pub const OUTPUT_FIELDS: [OutputField; OUTPUT_FIELD_COUNT] = [
    OutputField::single(names::FIRST_BOROUGH_NAME, Wa1, FieldSlot::span(360, 369)),
    OutputField::single(names::HOUSE_NUMBER_DISPLAY, Wa1, FieldSlot::span(369, 385)),
    OutputField::single(names::HOUSE_NUMBER_SORT, Wa1, FieldSlot::span(385, 396)),
    OutputField::single(names::B10SC, Wa1, FieldSlot::span(396, 407)),
    OutputField::single(names::SECOND_STREET_NAME, Wa1, FieldSlot::span(407, 439)),
    OutputField::single(names::COMMUNITY_DISTRICT, Wa2, FieldSlot::span(149, 152)),
    OutputField::single(names::ZIP_CODE, Wa2, FieldSlot::span(152, 157)),
    OutputField::single(names::ELECTION_DISTRICT, Wa2, FieldSlot::span(157, 160)),
    OutputField::single(names::ASSEMBLY_DISTRICT, Wa2, FieldSlot::span(160, 162)),
    OutputField::single(names::CONGRESSIONAL_DISTRICT, Wa2, FieldSlot::span(163, 165)),
    OutputField::single(names::STATE_SENATORIAL_DISTRICT, Wa2, FieldSlot::span(165, 167)),
    OutputField::single(names::CITY_COUNCIL_DISTRICT, Wa2, FieldSlot::span(169, 171)),
    OutputField::single(names::POLICE_PRECINCT, Wa2, FieldSlot::span(191, 194)),
    OutputField::single(names::COMMUNITY_SCHOOL_DISTRICT, Wa2, FieldSlot::span(203, 205)),
    OutputField::single(names::ATOMIC_POLYGON, Wa2, FieldSlot::span(205, 208)),
    OutputField::single(names::CENSUS_TRACT_2010, Wa2, FieldSlot::span(223, 229)),
    OutputField::single(names::CENSUS_BLOCK_2010, Wa2, FieldSlot::span(229, 233)),
    OutputField::single(names::CENSUS_BLOCK_SUFFIX_2010, Wa2, FieldSlot::byte(233)),
    OutputField::single(names::NTA, Wa2, FieldSlot::span(245, 249)),
    OutputField::single(names::DSNY_SNOW_PRIORITY, Wa2, FieldSlot::byte(249)),
    OutputField::single(names::HURRICANE_EVACUATION_ZONE, Wa2, FieldSlot::span(260, 262)),
    OutputField::composite(names::SEGMENT_COORDINATES, Wa2, &SEGMENT_COORDINATE_PARTS),
    OutputField::single(names::ROADWAY_TYPE, Wa2, FieldSlot::span(444, 446)),
    OutputField::single(names::BIKE_LANE, Wa2, FieldSlot::byte(486)),
    OutputField::single(names::NTA_NAME, Wa2, FieldSlot::span(553, 628)),
    OutputField::single(names::USPS_CITY_NAME, Wa2, FieldSlot::span(628, 653)),
    OutputField::single(names::LATITUDE, Wa2, FieldSlot::span(653, 662)),
    OutputField::single(names::LONGITUDE, Wa2, FieldSlot::span(662, 673)),
    OutputField::composite(names::BBL, Wa2, &BBL_PARTS),
    OutputField::single(names::BIN, Wa2, FieldSlot::span(1581, 1588)),
    OutputField::single(names::LOT_CENTROID, Wa2, FieldSlot::span(1699, 1713)),
    OutputField::single(names::SPATIAL_X, Wa2, FieldSlot::span(125, 132)),
    OutputField::single(names::SPATIAL_Y, Wa2, FieldSlot::span(132, 139)),
    OutputField::single(names::MESSAGE, Wa1, FieldSlot::span(579, 659)),
];

/// 解码时缓冲 `kind` 至少需要的字节数，即输出表在该缓冲上的最大结束偏移。
#[must_use]
pub const fn required_len(kind: BufferKind) -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < OUTPUT_FIELDS.len() {
        let field = &OUTPUT_FIELDS[i];
        if field.buffer as u8 == kind as u8 && field.max_end() > max {
            max = field.max_end();
        }
        i += 1;
    }
    max
}

/// 解码 WA1 的最小长度。
pub const WA1_REQUIRED_LEN: usize = required_len(BufferKind::InputOutput);
/// 解码 WA2 的最小长度。
pub const WA2_REQUIRED_LEN: usize = required_len(BufferKind::OutputOnly);

/// 按名称查找输出字段。
#[must_use]
pub fn output_field(name: &str) -> Option<&'static OutputField> {
    OUTPUT_FIELDS.iter().find(|field| field.name == name)
}

const fn input_fields_are_contiguous() -> bool {
    let mut cursor = 0;
    let mut i = 0;
    while i < INPUT_FIELDS.len() {
        if INPUT_FIELDS[i].slot.offset() != cursor {
            return false;
        }
        cursor = INPUT_FIELDS[i].slot.end();
        i += 1;
    }
    cursor <= WA1_LEN
}

const _: () = assert!(input_fields_are_contiguous());
const _: () = assert!(WA1_REQUIRED_LEN <= WA1_LEN);
const _: () = assert!(WA2_REQUIRED_LEN <= WA2_LEN);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_lengths_follow_the_table() {
        assert_eq!(WA1_REQUIRED_LEN, 659);
        assert_eq!(WA2_REQUIRED_LEN, 1713);
    }

    #[test]
    fn input_layout_ends_after_zip_code() {
        let last = INPUT_FIELDS.last().expect("输入表不应为空");
        assert_eq!(last.slot.end(), 218);
        let total: usize = INPUT_FIELDS.iter().map(|field| field.slot.len()).sum();
        assert_eq!(total, 218);
    }

    #[test]
    fn street_code_keeps_eleven_bytes() {
        let field = output_field(names::B10SC).expect("B10SC 字段必须存在");
        assert_eq!(field.buffer, BufferKind::InputOutput);
        assert_eq!(field.shape, OutputShape::Single(FieldSlot::new(396, 11)));
    }

    #[test]
    fn composite_extent_covers_all_parts() {
        let bbl = output_field(names::BBL).expect("BBL 字段必须存在");
        assert_eq!(bbl.extent(), FieldSlot::span(1533, 1543));
        let segment = output_field(names::SEGMENT_COORDINATES).expect("坐标组必须存在");
        assert_eq!(segment.extent(), FieldSlot::span(313, 355));
        assert!(segment.is_composite());
    }

    #[test]
    fn overflowing_slot_never_fits() {
        let slot = FieldSlot::new(usize::MAX, 2);
        assert_eq!(slot.end(), usize::MAX);
        assert!(!slot.fits(WA2_LEN));
        assert!(!slot.fits(usize::MAX));
        assert!(FieldSlot::new(usize::MAX - 2, 2).fits(usize::MAX));
    }

    #[test]
    fn overlap_detection_ignores_adjacent_slots() {
        let a = FieldSlot::span(10, 20);
        assert!(!a.overlaps(&FieldSlot::span(20, 25)));
        assert!(a.overlaps(&FieldSlot::span(19, 25)));
        assert!(!a.overlaps(&FieldSlot::new(15, 0)));
    }
}
