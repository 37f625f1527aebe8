//! 批处理端到端场景：内存中的 CSV 输入经夹具引擎处理后写出。

use spark_codec_geosupport::{WorkArea, layout::names};
use spark_geocoder::{
    BatchGeocoder, BatchSummary, ColumnMapping, EngineError, FnEngine, GeocodeEngine,
    GeocoderError, OUTPUT_COLUMNS,
};
use tracing_test::traced_test;

/// 模拟引擎：按 WA1 中的行政区代码回填邮编与 BBL；代码为 `9` 的门牌号触发失败。
fn fixture_engine() -> impl GeocodeEngine {
    FnEngine::new("fixture", |wa1: &mut WorkArea, wa2: &mut WorkArea| {
        if wa1.as_bytes()[2] == b'9' {
            return Err(EngineError::Failed {
                detail: "GRC 42".into(),
            });
        }
        let borough = wa1.as_bytes()[56];
        let out = wa2.as_mut_bytes();
        out[152..157].copy_from_slice(b"11201");
        out[1533] = borough;
        out[1534..1543].copy_from_slice(b"012340056");
        Ok(())
    })
}

fn run(input: &str) -> (Result<BatchSummary, GeocoderError>, Vec<Vec<String>>) {
    let geocoder = BatchGeocoder::new(fixture_engine(), ColumnMapping::new("Address", "Borough", "Zip"))
        .with_passthrough(vec!["Id".to_owned()]);
    let mut output = Vec::new();
    let summary = geocoder.run(
        csv::Reader::from_reader(input.as_bytes()),
        csv::Writer::from_writer(&mut output),
    );

    let rows = csv::Reader::from_reader(output.as_slice())
        .into_records()
        .map(|record| {
            record
                .expect("输出必须是合法 CSV")
                .iter()
                .map(str::to_owned)
                .collect()
        })
        .collect();
    (summary, rows)
}

fn header() -> Vec<String> {
    std::iter::once("Id")
        .chain(OUTPUT_COLUMNS)
        .map(str::to_owned)
        .collect()
}

fn column<'a>(row: &'a [String], name: &str) -> &'a str {
    let index = header()
        .iter()
        .position(|header| header == name)
        .expect("列必须存在");
    &row[index]
}

#[test]
fn rows_flow_through_engine_into_output() {
    let (summary, rows) = run("Id,Address,Borough,Zip\n\
         1,123 Main St,Brooklyn,11201\n\
         2,1 Centre St,manhattan,10007\n");

    let summary = summary.expect("两行都应成功");
    assert_eq!(
        summary,
        BatchSummary {
            rows: 2,
            unknown_boroughs: 0,
            truncated_rows: 0,
        }
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(column(&rows[0], "Id"), "1");
    assert_eq!(column(&rows[0], names::ZIP_CODE), "11201");
    assert_eq!(column(&rows[0], names::BBL), "3012340056");
    assert_eq!(column(&rows[1], names::BBL), "1012340056");
}

#[test]
fn header_matches_output_columns() {
    let mut output = Vec::new();
    BatchGeocoder::new(fixture_engine(), ColumnMapping::new("Address", "Borough", "Zip"))
        .with_passthrough(vec!["Id".to_owned()])
        .run(
            csv::Reader::from_reader(&b"Id,Address,Borough,Zip\n"[..]),
            csv::Writer::from_writer(&mut output),
        )
        .expect("空输入也应写出表头");

    let headers: Vec<String> = csv::Reader::from_reader(output.as_slice())
        .headers()
        .expect("表头必须可读")
        .iter()
        .map(str::to_owned)
        .collect();
    assert_eq!(headers, header());
}

#[test]
#[traced_test]
fn unknown_borough_is_warned_and_counted() {
    let (summary, rows) = run("Id,Address,Borough,Zip\n7,1 Main St,Atlantis,00000\n");

    let summary = summary.expect("未知行政区不终止处理");
    assert_eq!(summary.unknown_boroughs, 1);
    assert_eq!(column(&rows[0], names::BBL), "012340056");
    assert!(logs_contain("无法识别行政区"));
    assert!(logs_contain("Atlantis"));
}

#[test]
#[traced_test]
fn truncated_street_name_is_warned_and_counted() {
    let long_street = "X".repeat(40);
    let (summary, _) = run(&format!(
        "Id,Address,Borough,Zip\n3,10 {long_street},Queens,11101\n"
    ));

    assert_eq!(summary.expect("截断不终止处理").truncated_rows, 1);
    assert!(logs_contain("已截断"));
}

#[test]
fn engine_failure_reports_data_row_number() {
    let (summary, rows) = run("Id,Address,Borough,Zip\n\
         1,1 Main St,Bronx,10451\n\
         2,9 Main St,Bronx,10451\n\
         3,5 Main St,Bronx,10451\n");

    let err = summary.expect_err("第二行触发引擎失败");
    assert!(matches!(err, GeocoderError::Engine { row: 2, .. }));
    assert!(rows.len() <= 1, "失败之后的行不应写出");
}

#[test]
fn missing_column_fails_before_any_row() {
    let (summary, rows) = run("Id,Street,Borough,Zip\n1,1 Main St,Bronx,10451\n");

    assert!(matches!(
        summary,
        Err(GeocoderError::MissingColumn { ref column, .. }) if column == "Address"
    ));
    assert!(rows.is_empty());
}
