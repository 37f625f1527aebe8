//! 从分隔文件读取地址记录。
//!
//! # 契约说明（What）
//! - 构造时按配置的列名在表头中查找列位置，缺失即返回 [`GeocoderError::MissingColumn`]，不会在中途才失败。
//! - 每行取值先去掉首尾空白；完整街道地址在第一个空白处拆分：首段为门牌号，其余各段以单个空格拼接为街道名。
//! - 行政区按 [`Borough::parse`] 解析，未识别时记录为 `None`（编码时写入空白哨兵），原始文本保留在
//!   [`SourceRow::borough_input`] 中供日志使用。

use std::io::Read;

use spark_codec_geosupport::{AddressRecord, Borough};

use crate::{config::ColumnMapping, error::GeocoderError};

/// 读取到的一行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 数据行号，从 1 开始，不含表头。
    pub row: u64,
    /// 编码输入。
    pub record: AddressRecord,
    /// 行政区列的原始文本（已去首尾空白）。
    pub borough_input: String,
    /// 原样复制到输出的列值，顺序与配置一致。
    pub passthrough: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    street_address: usize,
    borough: usize,
    zip_code: usize,
}

/// CSV 地址源。
#[derive(Debug)]
pub struct AddressSource<R> {
    reader: csv::Reader<R>,
    indices: ColumnIndices,
    passthrough: Vec<usize>,
    row: u64,
}

impl<R: Read> AddressSource<R> {
    /// 包装已配置好分隔符的 CSV 读取器，并校验列名。
    pub fn new(
        mut reader: csv::Reader<R>,
        columns: &ColumnMapping,
        passthrough_columns: &[String],
    ) -> Result<Self, GeocoderError> {
        let headers = reader.headers()?.clone();
        let locate = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| GeocoderError::MissingColumn {
                    column: name.to_owned(),
                    available: headers.iter().map(str::to_owned).collect(),
                })
        };

        let indices = ColumnIndices {
            street_address: locate(&columns.street_address)?,
            borough: locate(&columns.borough)?,
            zip_code: locate(&columns.zip_code)?,
        };
        let passthrough = passthrough_columns
            .iter()
            .map(|name| locate(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            reader,
            indices,
            passthrough,
            row: 0,
        })
    }

    fn next_row(&mut self) -> Result<Option<SourceRow>, GeocoderError> {
        let mut record = csv::StringRecord::new();
        if !self.reader.read_record(&mut record)? {
            return Ok(None);
        }
        self.row += 1;

        let field = |index: usize| record.get(index).unwrap_or_default().trim();
        let (house_number, street_name) = split_street_address(field(self.indices.street_address));
        let borough_input = field(self.indices.borough).to_owned();
        let borough = Borough::parse(&borough_input);

        Ok(Some(SourceRow {
            row: self.row,
            record: AddressRecord {
                house_number,
                borough,
                street_name,
                zip_code: field(self.indices.zip_code).to_owned(),
            },
            borough_input,
            passthrough: self
                .passthrough
                .iter()
                .map(|&index| field(index).to_owned())
                .collect(),
        }))
    }
}

impl<R: Read> Iterator for AddressSource<R> {
    type Item = Result<SourceRow, GeocoderError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

/// 把完整街道地址拆成 `(门牌号, 街道名)`。
///
/// ```
/// use spark_geocoder::split_street_address;
///
/// assert_eq!(
///     split_street_address(" 123  Main   St "),
///     ("123".to_owned(), "Main St".to_owned())
/// );
/// assert_eq!(split_street_address(""), (String::new(), String::new()));
/// ```
#[must_use]
pub fn split_street_address(full: &str) -> (String, String) {
    let mut tokens = full.split_whitespace();
    let house_number = tokens.next().unwrap_or_default().to_owned();
    let street_name = tokens.collect::<Vec<_>>().join(" ");
    (house_number, street_name)
}
