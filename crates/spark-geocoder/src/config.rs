//! 批处理配置。
//!
//! # 教案定位（Why）
//! - 列名与文件路径都是运行期配置：可以写在 TOML 文件里，也可以由命令行覆盖，仍缺失的项再交互询问。
//! - 三层来源合并后得到 [`ResolvedConfig`]，批处理驱动只接触解析完毕、类型确定的配置。
//!
//! # 契约说明（What）
//! - TOML 使用 `deny_unknown_fields`，拼错的键直接报错，而不是静默忽略；
//! - 输出路径不以 `.csv` 结尾时自动补上后缀；
//! - 分隔符必须是单字节 ASCII 字符。
//!
//! ```toml
//! input = "addresses.csv"
//! output = "geocoded.csv"
//! delimiter = ","
//! passthrough_columns = ["id"]
//!
//! [columns]
//! street_address = "Address"
//! borough = "Borough"
//! zip_code = "Zip"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::GeocoderError, prompt::Prompter};

const DEFAULT_DELIMITER: char = ',';

/// 输入列名配置，每一项都可以暂缺。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    /// 完整街道地址列（门牌号 + 街道名）。
    pub street_address: Option<String>,
    /// 行政区列。
    pub borough: Option<String>,
    /// 邮政编码列。
    pub zip_code: Option<String>,
}

/// 可部分缺省的批处理配置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocoderConfig {
    /// 输入 CSV 路径。
    pub input: Option<PathBuf>,
    /// 输出 CSV 路径。
    pub output: Option<PathBuf>,
    /// 输入分隔符，缺省为 `,`。
    pub delimiter: Option<char>,
    /// 原样复制到输出前部的输入列。
    pub passthrough_columns: Vec<String>,
    /// 输入列名。
    pub columns: ColumnConfig,
}

impl GeocoderConfig {
    /// 解析 TOML 文本。
    pub fn from_toml_str(text: &str) -> Result<Self, GeocoderError> {
        Ok(toml::from_str(text)?)
    }

    /// 读取并解析 TOML 配置文件。
    pub fn load(path: &Path) -> Result<Self, GeocoderError> {
        let text = fs::read_to_string(path).map_err(|source| GeocoderError::io(path, source))?;
        Self::from_toml_str(&text)
    }

    /// 以 `overrides` 中已给出的项覆盖当前配置。
    #[must_use]
    pub fn merge(self, overrides: GeocoderConfig) -> Self {
        Self {
            input: overrides.input.or(self.input),
            output: overrides.output.or(self.output),
            delimiter: overrides.delimiter.or(self.delimiter),
            passthrough_columns: if overrides.passthrough_columns.is_empty() {
                self.passthrough_columns
            } else {
                overrides.passthrough_columns
            },
            columns: ColumnConfig {
                street_address: overrides.columns.street_address.or(self.columns.street_address),
                borough: overrides.columns.borough.or(self.columns.borough),
                zip_code: overrides.columns.zip_code.or(self.columns.zip_code),
            },
        }
    }

    /// 补齐缺失项并校验，得到最终配置。
    ///
    /// 询问顺序为：街道地址列、行政区列、邮编列、输入文件、输出文件。
    pub fn resolve(self, prompter: &mut dyn Prompter) -> Result<ResolvedConfig, GeocoderError> {
        let street_address = self
            .columns
            .street_address
            .map_or_else(|| prompter.ask("Name of street address column: "), Ok)?;
        let borough = self
            .columns
            .borough
            .map_or_else(|| prompter.ask("Name of borough column: "), Ok)?;
        let zip_code = self
            .columns
            .zip_code
            .map_or_else(|| prompter.ask("Name of zipcode column: "), Ok)?;
        let input = self
            .input
            .map_or_else(|| prompter.ask("csvfile location: ").map(PathBuf::from), Ok)?;
        let output = self
            .output
            .map_or_else(|| prompter.ask("outfile name: ").map(PathBuf::from), Ok)?;

        let delimiter = self.delimiter.unwrap_or(DEFAULT_DELIMITER);
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(GeocoderError::InvalidDelimiter(delimiter))?;

        Ok(ResolvedConfig {
            input,
            output: normalize_output_path(output),
            delimiter,
            passthrough_columns: self.passthrough_columns,
            columns: ColumnMapping {
                street_address,
                borough,
                zip_code,
            },
        })
    }
}

/// 解析完毕的输入列名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// 完整街道地址列。
    pub street_address: String,
    /// 行政区列。
    pub borough: String,
    /// 邮政编码列。
    pub zip_code: String,
}

impl ColumnMapping {
    /// 构造列名映射。
    pub fn new(
        street_address: impl Into<String>,
        borough: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            street_address: street_address.into(),
            borough: borough.into(),
            zip_code: zip_code.into(),
        }
    }
}

/// 批处理实际使用的配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// 输入 CSV 路径。
    pub input: PathBuf,
    /// 输出 CSV 路径，保证以 `.csv` 结尾。
    pub output: PathBuf,
    /// 输入分隔符。
    pub delimiter: u8,
    /// 原样复制的输入列。
    pub passthrough_columns: Vec<String>,
    /// 输入列名。
    pub columns: ColumnMapping,
}

/// 输出路径不以 `.csv` 结尾时追加该后缀（`out` → `out.csv`，`out.txt` → `out.txt.csv`）。
#[must_use]
pub fn normalize_output_path(path: PathBuf) -> PathBuf {
    if path.to_string_lossy().ends_with(".csv") {
        return path;
    }
    let mut raw = path.into_os_string();
    raw.push(".csv");
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;

    #[test]
    fn toml_file_round_trips_into_config() {
        let config = GeocoderConfig::from_toml_str(
            r#"
input = "in.csv"
delimiter = ";"
passthrough_columns = ["id"]

[columns]
street_address = "Address"
borough = "Boro"
"#,
        )
        .expect("合法 TOML 应可解析");
        assert_eq!(config.input, Some(PathBuf::from("in.csv")));
        assert_eq!(config.delimiter, Some(';'));
        assert_eq!(config.columns.borough.as_deref(), Some("Boro"));
        assert_eq!(config.columns.zip_code, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GeocoderConfig::from_toml_str("inptu = \"typo.csv\"").expect_err("未知键必须报错");
        assert!(matches!(err, GeocoderError::Config(_)));
    }

    #[test]
    fn overrides_win_and_missing_values_are_prompted() {
        let file = GeocoderConfig {
            input: Some("file.csv".into()),
            columns: ColumnConfig {
                street_address: Some("Address".into()),
                borough: Some("Borough".into()),
                zip_code: None,
            },
            ..GeocoderConfig::default()
        };
        let flags = GeocoderConfig {
            input: Some("flag.csv".into()),
            ..GeocoderConfig::default()
        };
        let mut prompter = ScriptedPrompter::new(["ZIP", "result"]);

        let resolved = file
            .merge(flags)
            .resolve(&mut prompter)
            .expect("补齐后应解析成功");

        assert_eq!(resolved.input, PathBuf::from("flag.csv"));
        assert_eq!(resolved.output, PathBuf::from("result.csv"));
        assert_eq!(resolved.columns, ColumnMapping::new("Address", "Borough", "ZIP"));
        assert_eq!(resolved.delimiter, b',');
        assert_eq!(
            prompter.asked(),
            &["Name of zipcode column: ", "outfile name: "]
        );
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let config = GeocoderConfig {
            input: Some("in.csv".into()),
            output: Some("out.csv".into()),
            delimiter: Some('；'),
            columns: ColumnConfig {
                street_address: Some("a".into()),
                borough: Some("b".into()),
                zip_code: Some("z".into()),
            },
            ..GeocoderConfig::default()
        };
        let err = config
            .resolve(&mut ScriptedPrompter::new::<[&str; 0]>([]))
            .expect_err("全角分号必须报错");
        assert!(matches!(err, GeocoderError::InvalidDelimiter('；')));
    }

    #[test]
    fn output_suffix_is_appended_once() {
        assert_eq!(normalize_output_path("out".into()), PathBuf::from("out.csv"));
        assert_eq!(normalize_output_path("out.csv".into()), PathBuf::from("out.csv"));
        assert_eq!(normalize_output_path("out.txt".into()), PathBuf::from("out.txt.csv"));
    }
}
