#![doc = r#"
# spark-geocoder

## 设计动机（Why）
- **定位**：把 CSV 中的纽约市地址批量送入 Geosupport 引擎，并把引擎写回的工作区解码为结构化列。
- **架构角色**：定宽布局的编解码细节全部委托给 `spark-codec-geosupport`；本 crate 只负责
  读取、配置、引擎调用与写出。
- **设计理念**：引擎通过 [`GeocodeEngine`] 以值注入，不存在进程级单例，测试与空跑都不需要原生库。

## 核心契约（What）
- **输入条件**：输入 CSV 必须带表头，且包含配置的街道地址、行政区、邮编三列；
- **输出保障**：每个输入行对应一个输出行，列顺序固定为 [`OUTPUT_COLUMNS`]，可在其前追加复制列；
- **失败语义**：编解码或引擎失败终止整批处理，错误携带数据行号（从 1 开始，不含表头）。

## 实现策略（How）
- [`AddressSource`] 逐行产出 [`AddressRecord`](spark_codec_geosupport::AddressRecord)；
- [`BatchGeocoder`] 对每行执行编码 → 引擎 → 解码，并通过 `tracing` 记录异常输入；
- [`ResultSink`] 写出结果，配置由 [`GeocoderConfig`] 合并 TOML、命令行与交互回答得到。

## 风险与考量（Trade-offs）
- **串行处理**：原生引擎不可重入，批处理逐行执行；
- **原生链接**：只有启用 `native` 特性时才链接 Geosupport 动态库，默认构建不依赖它。
"#]
#![warn(missing_docs)]

mod batch;
mod config;
mod engine;
mod error;
mod prompt;
mod sink;
mod source;
pub mod telemetry;

pub use crate::{
    batch::{BatchGeocoder, BatchSummary, GeocodedRecord},
    config::{ColumnConfig, ColumnMapping, GeocoderConfig, ResolvedConfig, normalize_output_path},
    engine::{DryRunEngine, FnEngine, GeocodeEngine, NATIVE_DISABLED_HINT, check_work_areas},
    error::{EngineError, GeocoderError},
    prompt::{Prompter, ScriptedPrompter, StdioPrompter},
    sink::{OUTPUT_COLUMNS, ResultSink},
    source::{AddressSource, SourceRow, split_street_address},
};

#[cfg(feature = "native")]
pub use crate::engine::NativeEngine;
