//! 纽约市行政区名称与单字符代码的映射。
//!
//! 未识别的输入不是错误：编码时行政区槽位写入空白哨兵 [`UNKNOWN_BOROUGH`]，
//! 需要严格校验的调用方应自行检查 `Option<Borough>` 是否为 `None`。

/// 未识别行政区时写入槽位的哨兵字符。
pub const UNKNOWN_BOROUGH: char = ' ';

/// 纽约市五个行政区，判别值即引擎使用的代码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Borough {
    /// 曼哈顿，代码 1。
    Manhattan = 1,
    /// 布朗克斯，代码 2。
    Bronx = 2,
    /// 布鲁克林，代码 3。
    Brooklyn = 3,
    /// 皇后区，代码 4。
    Queens = 4,
    /// 史坦顿岛，代码 5。
    StatenIsland = 5,
}

impl Borough {
    /// 按代码顺序排列的全部行政区。
    pub const ALL: [Borough; 5] = [
        Self::Manhattan,
        Self::Bronx,
        Self::Brooklyn,
        Self::Queens,
        Self::StatenIsland,
    ];

    /// 数字代码 1–5。
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// 写入槽位的代码字符 `'1'`–`'5'`。
    #[must_use]
    pub const fn code_char(self) -> char {
        (b'0' + self.code()) as char
    }

    /// 引擎认可的完整大写名称。
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "MANHATTAN",
            Self::Bronx => "BRONX",
            Self::Brooklyn => "BROOKLYN",
            Self::Queens => "QUEENS",
            Self::StatenIsland => "STATEN ISLAND",
        }
    }

    /// 按完整名称匹配，忽略 ASCII 大小写；缩写、别称或附加后缀（如 `Queens County`）均不匹配。
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|borough| borough.name().eq_ignore_ascii_case(name))
    }

    /// 按数字代码查找。
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Manhattan),
            2 => Some(Self::Bronx),
            3 => Some(Self::Brooklyn),
            4 => Some(Self::Queens),
            5 => Some(Self::StatenIsland),
            _ => None,
        }
    }

    /// 接受完整名称或已解析的单个数字代码（`"1"`–`"5"`）。
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.as_bytes() {
            [digit @ b'0'..=b'9'] => Self::from_code(digit - b'0'),
            _ => Self::from_name(input),
        }
    }
}

/// 将行政区名称映射为槽位字符，未识别时返回 [`UNKNOWN_BOROUGH`]。
///
/// ```
/// use spark_codec_geosupport::borough_code;
///
/// assert_eq!(borough_code("brooklyn"), '3');
/// assert_eq!(borough_code("Queens County"), ' ');
/// ```
#[must_use]
pub fn borough_code(name: &str) -> char {
    Borough::from_name(name).map_or(UNKNOWN_BOROUGH, Borough::code_char)
}
