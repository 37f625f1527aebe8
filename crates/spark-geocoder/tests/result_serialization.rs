//! 解码结果的结构化序列化：键顺序与组合字段嵌套。

use spark_codec_geosupport::{
    AddressRecord, Borough, WA1_LEN, WA2_LEN, decode_work_areas, layout::names,
};

fn populated_result() -> spark_codec_geosupport::GeocodeResult {
    let mut wa1 = vec![b' '; WA1_LEN];
    let mut wa2 = vec![b' '; WA2_LEN];
    wa1[360..368].copy_from_slice(b"BROOKLYN");
    wa2[152..157].copy_from_slice(b"11201");
    wa2[313..320].copy_from_slice(b"0987654");
    wa2[1533..1543].copy_from_slice(b"3012340056");
    decode_work_areas(&wa1, &wa2).expect("完整长度的缓冲必须可解码")
}

#[test]
fn result_serializes_as_ordered_map() {
    let json = serde_json::to_string(&populated_result()).expect("序列化为 JSON 不应失败");

    let positions: Vec<usize> = [
        names::FIRST_BOROUGH_NAME,
        names::ZIP_CODE,
        names::SEGMENT_COORDINATES,
        names::BBL,
        names::MESSAGE,
    ]
    .iter()
    .map(|name| json.find(&format!("\"{name}\":")).expect("键必须出现"))
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "键顺序应与布局表一致：{json}");
    assert!(json.starts_with("{\"First Borough Name\":\"BROOKLYN\""));
}

#[test]
fn composite_fields_nest_as_maps() {
    let value = serde_json::to_value(populated_result()).expect("序列化为 JSON 不应失败");
    let object = value.as_object().expect("结果应为对象");
    assert_eq!(object.len(), 34);
    assert_eq!(object[names::ZIP_CODE], "11201");

    let bbl = object[names::BBL].as_object().expect("BBL 应为嵌套对象");
    assert_eq!(bbl.len(), 3);
    assert_eq!(bbl[names::BBL_BOROUGH], "3");
    assert_eq!(bbl[names::TAX_BLOCK], "01234");
    assert_eq!(bbl[names::TAX_LOT], "0056");

    let segment = object[names::SEGMENT_COORDINATES]
        .as_object()
        .expect("坐标组应为嵌套对象");
    assert_eq!(segment.len(), 6);
    assert_eq!(segment[names::X_LOW], "0987654");
    assert_eq!(segment[names::Z_HIGH], "");
}

#[test]
fn address_record_round_trips() {
    let record = AddressRecord::new("42-10", Some(Borough::Queens), "NORTHERN BLVD", "11101");
    let json = serde_json::to_string(&record).expect("序列化不应失败");
    let back: AddressRecord = serde_json::from_str(&json).expect("反序列化不应失败");
    assert_eq!(back, record);
    assert!(json.contains("\"borough\":\"Queens\""));
}
