//! 定宽字段格式化。
//!
//! # 教案定位（Why）
//! - 引擎只认定宽、大写、右补空格的文本槽位；过长的值按槽位长度静默截断，这是与引擎共享的既有契约。
//! - 截断虽不报错，但 [`FormattedField::is_truncated`] 保留了“是否丢失数据”的信息，需要严格校验的调用方可据此拦截。
//!
//! # 契约说明（What）
//! - 输出恰好为 `target_len` 个字符，对任意可格式化输入都成立。
//! - 大写转换逐字符进行且保持长度：大写形式为单字符的替换之，会展开成多字符的（如 `ß`）保持原样；
//!   Latin-1 字符的大写形式超出 Latin-1 时（如 `ÿ` → `Ÿ`）同样保持原样，避免写入工作区时变成 `?`。

use alloc::string::{String, ToString};
use core::fmt;

/// 格式化后的定宽字段文本。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormattedField {
    text: String,
    truncated: bool,
}

impl FormattedField {
    /// 定宽文本。
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 原始值是否因超出槽位长度而被截断。
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// 字符数，恒等于格式化时的目标长度。
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// 取出内部文本。
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for FormattedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for FormattedField {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// 将任意可显示的值规整为 `target_len` 个字符的大写定宽文本。
///
/// # 调用契约（What）
/// - **输入**：`value` 为任意实现 [`fmt::Display`] 的值；`target_len` 为槽位字符数，可以为 0。
/// - **输出**：超长时保留前 `target_len` 个字符并标记截断，不足时右补空格，最后整体大写。
///
/// ```
/// use spark_codec_geosupport::format_field;
///
/// let field = format_field("main st", 10);
/// assert_eq!(field.as_str(), "MAIN ST   ");
/// assert!(!field.is_truncated());
///
/// let field = format_field(1234567, 4);
/// assert_eq!(field.as_str(), "1234");
/// assert!(field.is_truncated());
/// ```
#[must_use]
pub fn format_field(value: impl fmt::Display, target_len: usize) -> FormattedField {
    let source = value.to_string();
    let mut chars = source.chars();
    let mut text = String::with_capacity(target_len);
    let mut written = 0;

    for ch in chars.by_ref().take(target_len) {
        text.push(upper_char(ch));
        written += 1;
    }
    let truncated = chars.next().is_some();

    text.extend(core::iter::repeat_n(' ', target_len - written));

    FormattedField { text, truncated }
}

/// 保持长度的单字符大写。
///
/// 工作区中可表示的字符（U+0000..=U+00FF）若大写后落在该范围之外（如 `ÿ`、`µ`），保持原样。
pub(crate) fn upper_char(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) if u32::from(single) <= LATIN1_MAX || u32::from(ch) > LATIN1_MAX => {
            single
        }
        _ => ch,
    }
}

const LATIN1_MAX: u32 = 0xFF;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_and_uppercases_short_values() {
        let field = format_field("123", 16);
        assert_eq!(field.as_str(), "123             ");
        assert_eq!(field.char_len(), 16);
        assert!(!field.is_truncated());
    }

    #[test]
    fn exact_length_is_not_truncation() {
        let field = format_field("11201", 5);
        assert_eq!(field.as_str(), "11201");
        assert!(!field.is_truncated());
    }

    #[test]
    fn zero_length_slot_yields_empty_text() {
        let field = format_field("anything", 0);
        assert_eq!(field.as_str(), "");
        assert!(field.is_truncated());

        let empty = format_field("", 0);
        assert!(!empty.is_truncated());
    }

    #[test]
    fn latin1_letters_stay_representable() {
        let field = format_field("café ÿ µ", 8);
        assert_eq!(field.as_str(), "CAFÉ ÿ µ");
        assert!(field.as_str().chars().all(|ch| u32::from(ch) <= LATIN1_MAX));
        assert_eq!(format_field("ā", 1).as_str(), "Ā");
    }

    #[test]
    fn expanding_uppercase_keeps_width() {
        let field = format_field("straße", 6);
        assert_eq!(field.as_str(), "STRAßE");
        assert_eq!(field.char_len(), 6);
    }
}
