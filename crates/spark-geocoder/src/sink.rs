//! 把解码结果写成分隔文件。
//!
//! # 契约说明（What）
//! - 表头固定为 [`OUTPUT_COLUMNS`]（与历史输出文件保持同一列序），其前可选地追加原样复制的输入列；
//! - 组合字段整组写为一列，取值为 [`GeocodeValue::to_column_text`]，即各子槽位原样拼接的表示。

use std::io::Write;

use spark_codec_geosupport::{GeocodeResult, GeocodeValue, layout::names};

use crate::error::GeocoderError;

/// 输出列顺序，覆盖解码表的全部顶层字段。
pub const OUTPUT_COLUMNS: [&str; 34] = [
    names::CENSUS_BLOCK_2010,
    names::CENSUS_BLOCK_SUFFIX_2010,
    names::CENSUS_TRACT_2010,
    names::ASSEMBLY_DISTRICT,
    names::ATOMIC_POLYGON,
    names::B10SC,
    names::BIKE_LANE,
    names::BBL,
    names::BIN,
    names::CITY_COUNCIL_DISTRICT,
    names::COMMUNITY_DISTRICT,
    names::COMMUNITY_SCHOOL_DISTRICT,
    names::CONGRESSIONAL_DISTRICT,
    names::DSNY_SNOW_PRIORITY,
    names::ELECTION_DISTRICT,
    names::FIRST_BOROUGH_NAME,
    names::HOUSE_NUMBER_DISPLAY,
    names::HOUSE_NUMBER_SORT,
    names::HURRICANE_EVACUATION_ZONE,
    names::MESSAGE,
    names::NTA_NAME,
    names::NTA,
    names::POLICE_PRECINCT,
    names::ROADWAY_TYPE,
    names::SECOND_STREET_NAME,
    names::SEGMENT_COORDINATES,
    names::STATE_SENATORIAL_DISTRICT,
    names::USPS_CITY_NAME,
    names::LOT_CENTROID,
    names::ZIP_CODE,
    names::LATITUDE,
    names::LONGITUDE,
    names::SPATIAL_X,
    names::SPATIAL_Y,
];

/// CSV 结果汇。
#[derive(Debug)]
pub struct ResultSink<W: Write> {
    writer: csv::Writer<W>,
    passthrough_len: usize,
}

impl<W: Write> ResultSink<W> {
    /// 写出表头：先是原样复制的输入列，再是 [`OUTPUT_COLUMNS`]。
    pub fn new(
        mut writer: csv::Writer<W>,
        passthrough_columns: &[String],
    ) -> Result<Self, GeocoderError> {
        writer.write_record(
            passthrough_columns
                .iter()
                .map(String::as_str)
                .chain(OUTPUT_COLUMNS),
        )?;
        Ok(Self {
            writer,
            passthrough_len: passthrough_columns.len(),
        })
    }

    /// 写出一行结果。`passthrough` 的长度必须与表头中的复制列数一致，多出的值被忽略，缺少的补空。
    pub fn write(
        &mut self,
        passthrough: &[String],
        result: &GeocodeResult,
    ) -> Result<(), GeocoderError> {
        let copied = (0..self.passthrough_len)
            .map(|index| passthrough.get(index).map_or("", String::as_str).to_owned());
        let decoded = OUTPUT_COLUMNS.iter().map(|name| {
            result
                .get(name)
                .map(GeocodeValue::to_column_text)
                .unwrap_or_default()
                .into_owned()
        });
        self.writer.write_record(copied.chain(decoded))?;
        Ok(())
    }

    /// 刷新缓冲并取回底层写入端。
    pub fn finish(self) -> Result<W, GeocoderError> {
        self.writer
            .into_inner()
            .map_err(|err| GeocoderError::Csv(csv::Error::from(err.into_error())))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use spark_codec_geosupport::{decode_work_areas, layout::OUTPUT_FIELDS};

    use super::*;

    #[test]
    fn columns_cover_every_top_level_field() {
        let columns: BTreeSet<_> = OUTPUT_COLUMNS.into_iter().collect();
        let fields: BTreeSet<_> = OUTPUT_FIELDS.iter().map(|field| field.name).collect();
        assert_eq!(columns, fields);
        assert_eq!(columns.len(), OUTPUT_COLUMNS.len());
    }

    #[test]
    fn composite_fields_are_one_column() {
        let wa1 = vec![b' '; 1200];
        let mut wa2 = vec![b' '; 4300];
        wa2[1533..1543].copy_from_slice(b"1000470001");
        wa2[152..157].copy_from_slice(b"10004");
        let result = decode_work_areas(&wa1, &wa2).expect("解码不应失败");

        let mut sink = ResultSink::new(csv::Writer::from_writer(Vec::new()), &["Id".to_owned()])
            .expect("表头写入内存不应失败");
        sink.write(&["9".to_owned()], &result).expect("写入内存不应失败");
        let text = String::from_utf8(sink.finish().expect("刷新不应失败")).expect("输出为 UTF-8");

        let mut lines = text.lines();
        let header: Vec<_> = lines.next().expect("应有表头").split(',').collect();
        let row: Vec<_> = lines.next().expect("应有数据行").split(',').collect();
        let column = |name: &str| {
            let index = header
                .iter()
                .position(|header| header.trim_matches('"') == name)
                .expect("列必须存在");
            row[index]
        };
        assert_eq!(header[0], "Id");
        assert_eq!(column("Id"), "9");
        assert_eq!(column(names::BBL), "1000470001");
        assert_eq!(column(names::ZIP_CODE), "10004");
    }
}
