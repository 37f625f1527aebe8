//! 批处理驱动：读取 → 编码 → 引擎 → 解码 → 写出。
//!
//! # 教案定位（Why）
//! - 把逐行流水线集中在一个类型里，引擎以值注入，调用方可以在测试中换成夹具引擎，
//!   在生产中换成持锁的原生句柄，驱动本身不关心差异。
//!
//! # 契约说明（What）
//! - 任意一行的编解码或引擎失败都会终止整批处理，错误中携带该行行号；已经写出的行保留在输出中。
//! - 行政区无法识别与字段截断不会终止处理，只记 `warn` 日志并计入 [`BatchSummary`]。
//!
//! # 风险提示（Trade-offs）
//! - 驱动逐行串行执行。原生引擎不可重入，并行化不会带来吞吐提升，反而需要额外的排序与合并。

use std::{
    fs::File,
    io::{Read, Write},
};

use spark_codec_geosupport::{AddressRecord, GeocodeResult, WorkAreaCodec};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{ColumnMapping, ResolvedConfig},
    engine::GeocodeEngine,
    error::GeocoderError,
    sink::ResultSink,
    source::{AddressSource, SourceRow},
};

/// 一次批处理的统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// 写出的数据行数。
    pub rows: u64,
    /// 行政区无法识别、以空白哨兵编码的行数。
    pub unknown_boroughs: u64,
    /// 至少一个输入字段被截断的行数。
    pub truncated_rows: u64,
}

/// 单条记录的地理编码结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodedRecord {
    /// 解码后的输出字段。
    pub result: GeocodeResult,
    /// 编码时被截断的输入字段名。
    pub truncated_fields: Vec<&'static str>,
}

/// 批量地理编码器。
#[derive(Debug)]
pub struct BatchGeocoder<E> {
    engine: E,
    codec: WorkAreaCodec,
    columns: ColumnMapping,
    passthrough_columns: Vec<String>,
}

impl<E: GeocodeEngine> BatchGeocoder<E> {
    /// 以引擎与输入列名构造。
    pub fn new(engine: E, columns: ColumnMapping) -> Self {
        Self {
            engine,
            codec: WorkAreaCodec::new(),
            columns,
            passthrough_columns: Vec::new(),
        }
    }

    /// 设置原样复制到输出前部的输入列。
    #[must_use]
    pub fn with_passthrough(mut self, columns: Vec<String>) -> Self {
        self.passthrough_columns = columns;
        self
    }

    /// 当前使用的引擎。
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// 对单条记录执行编码、引擎调用与解码；`row` 只用于错误上下文。
    pub fn geocode_record(
        &self,
        row: u64,
        record: &AddressRecord,
    ) -> Result<GeocodedRecord, GeocoderError> {
        let mut encoded = self
            .codec
            .encode(record)
            .map_err(|source| GeocoderError::Codec { row, source })?;

        let (wa1, wa2) = encoded.work_areas_mut();
        self.engine
            .geocode(wa1, wa2)
            .map_err(|source| GeocoderError::Engine { row, source })?;

        let result = self
            .codec
            .decode_encoded(&encoded)
            .map_err(|source| GeocoderError::Codec { row, source })?;
        Ok(GeocodedRecord {
            result,
            truncated_fields: encoded.truncated_fields().to_vec(),
        })
    }

    /// 处理整个 CSV 输入并写出结果。
    ///
    /// `reader` 的分隔符与表头设置由调用方决定，表头必须存在。
    #[instrument(skip_all, fields(engine = self.engine.name()))]
    pub fn run<R: Read, W: Write>(
        &self,
        reader: csv::Reader<R>,
        writer: csv::Writer<W>,
    ) -> Result<BatchSummary, GeocoderError> {
        let source = AddressSource::new(reader, &self.columns, &self.passthrough_columns)?;
        let mut sink = ResultSink::new(writer, &self.passthrough_columns)?;
        let mut summary = BatchSummary::default();

        for row in source {
            let SourceRow {
                row,
                record,
                borough_input,
                passthrough,
            } = row?;

            if record.borough.is_none() {
                warn!(row, borough = %borough_input, "无法识别行政区，按空白代码编码");
                summary.unknown_boroughs += 1;
            }

            let geocoded = self.geocode_record(row, &record)?;
            if !geocoded.truncated_fields.is_empty() {
                warn!(row, fields = ?geocoded.truncated_fields, "输入超出槽位长度，已截断");
                summary.truncated_rows += 1;
            }

            sink.write(&passthrough, &geocoded.result)?;
            summary.rows += 1;
            debug!(row, "行处理完成");
        }

        sink.finish()?;
        info!(
            rows = summary.rows,
            unknown_boroughs = summary.unknown_boroughs,
            truncated_rows = summary.truncated_rows,
            "批处理完成"
        );
        Ok(summary)
    }

    /// 按解析完毕的配置打开输入输出文件并运行。
    pub fn run_files(&self, config: &ResolvedConfig) -> Result<BatchSummary, GeocoderError> {
        let input =
            File::open(&config.input).map_err(|source| GeocoderError::io(&config.input, source))?;
        let output = File::create(&config.output)
            .map_err(|source| GeocoderError::io(&config.output, source))?;
        info!(
            input = %config.input.display(),
            output = %config.output.display(),
            "开始批处理"
        );

        let reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .from_reader(input);
        self.run(reader, csv::Writer::from_writer(output))
    }
}

#[cfg(test)]
mod tests {
    use spark_codec_geosupport::{Borough, WorkArea, layout::names};

    use super::*;
    use crate::{engine::DryRunEngine, error::EngineError};

    #[test]
    fn dry_run_leaves_output_fields_blank() {
        let geocoder = BatchGeocoder::new(DryRunEngine, ColumnMapping::new("a", "b", "z"));
        let record = AddressRecord::new("1", Some(Borough::Manhattan), "BROADWAY", "10004");
        let geocoded = geocoder.geocode_record(1, &record).expect("空跑引擎不应失败");

        assert_eq!(geocoded.result.text(names::ZIP_CODE), Some(""));
        assert!(geocoded.truncated_fields.is_empty());
    }

    #[test]
    fn engine_failure_carries_row_number() {
        let engine = crate::engine::FnEngine::new("broken", |_: &mut WorkArea, _: &mut WorkArea| {
            Err(EngineError::Failed {
                detail: "GRC 99".into(),
            })
        });
        let geocoder = BatchGeocoder::new(engine, ColumnMapping::new("a", "b", "z"));
        let record = AddressRecord::new("1", None, "BROADWAY", "");
        let err = geocoder
            .geocode_record(42, &record)
            .expect_err("夹具引擎总是失败");
        assert!(matches!(err, GeocoderError::Engine { row: 42, .. }));
    }
}
