//! 批量地理编码工具：读取地址 CSV，逐行调用 Geosupport，写出带地理属性的 CSV。
//!
//! # 使用方法
//! ```bash
//! cargo run -p spark-geocoder --features native --bin spark-geocode -- \
//!     --input addresses.csv --output geocoded --address-column Address \
//!     --borough-column Borough --zip-column Zip
//! ```
//! - `--config`：可选，TOML 配置文件；命令行参数覆盖文件中的同名项。
//! - 仍缺失的列名与路径会在终端中逐项询问。
//! - `--dry-run`：不调用原生库，只走通读取、编码、解码与写出。
//! - 日志级别由 `RUST_LOG` 控制，缺省为 `info`，输出到标准错误。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spark_geocoder::{
    BatchGeocoder, DryRunEngine, GeocodeEngine, GeocoderConfig, ResolvedConfig, StdioPrompter,
    telemetry,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "spark-geocode", version, about = "Batch geocode NYC addresses with Geosupport")]
struct Args {
    /// Path to TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV file.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output CSV file. `.csv` is appended when missing.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Column holding the full street address (house number and street name).
    #[arg(long)]
    address_column: Option<String>,

    /// Column holding the borough name.
    #[arg(long)]
    borough_column: Option<String>,

    /// Column holding the zip code.
    #[arg(long)]
    zip_column: Option<String>,

    /// Input field delimiter.
    #[arg(long)]
    delimiter: Option<char>,

    /// Input columns copied to the front of each output row.
    #[arg(long = "passthrough", value_name = "COLUMN")]
    passthrough_columns: Vec<String>,

    /// Run the pipeline without calling the native engine.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn overrides(&self) -> GeocoderConfig {
        let mut config = GeocoderConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            delimiter: self.delimiter,
            passthrough_columns: self.passthrough_columns.clone(),
            ..GeocoderConfig::default()
        };
        config.columns.street_address = self.address_column.clone();
        config.columns.borough = self.borough_column.clone();
        config.columns.zip_code = self.zip_column.clone();
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::install().context("初始化日志失败")?;

    let file_config = match &args.config {
        Some(path) => GeocoderConfig::load(path)
            .with_context(|| format!("读取配置文件 `{}` 失败", path.display()))?,
        None => GeocoderConfig::default(),
    };
    let config = file_config
        .merge(args.overrides())
        .resolve(&mut StdioPrompter::stdio())
        .context("配置不完整")?;

    let engine = select_engine(args.dry_run)?;
    info!(engine = engine.name(), "已选择地理编码引擎");
    run(engine, &config)
}

fn run(engine: Box<dyn GeocodeEngine>, config: &ResolvedConfig) -> Result<()> {
    let summary = BatchGeocoder::new(engine, config.columns.clone())
        .with_passthrough(config.passthrough_columns.clone())
        .run_files(config)
        .with_context(|| format!("处理 `{}` 失败", config.input.display()))?;

    eprintln!(
        "已写出 {} 行到 {}（行政区无法识别 {} 行，字段截断 {} 行）",
        summary.rows,
        config.output.display(),
        summary.unknown_boroughs,
        summary.truncated_rows
    );
    Ok(())
}

#[cfg(feature = "native")]
fn select_engine(dry_run: bool) -> Result<Box<dyn GeocodeEngine>> {
    if dry_run {
        return Ok(Box::new(DryRunEngine));
    }
    Ok(Box::new(spark_geocoder::NativeEngine::new()))
}

#[cfg(not(feature = "native"))]
fn select_engine(dry_run: bool) -> Result<Box<dyn GeocodeEngine>> {
    if dry_run {
        return Ok(Box::new(DryRunEngine));
    }
    Err(spark_geocoder::EngineError::Unavailable {
        engine: "geosupport-native",
        reason: spark_geocoder::NATIVE_DISABLED_HINT.to_owned(),
    }
    .into())
}
