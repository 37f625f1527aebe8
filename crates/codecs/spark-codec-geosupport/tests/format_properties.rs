//! 定宽格式化与编码字面量的性质测试。
//!
//! - 输出长度恒等于目标长度；
//! - 未超长时：结果为大写原文右补空格；
//! - 超长时：结果为原文前 `L` 个字符的大写，并标记截断；
//! - 任意记录编码后，事务码与区段码槽位保持不变。

use proptest::prelude::*;

use spark_codec_geosupport::{
    AddressRecord, Borough, encode_address, format_field,
    layout::{SECTION_CODE_SLOT, TRANSACTION_CODE_SLOT},
};

fn ascii_upper(text: &str) -> String {
    text.chars().map(|ch| ch.to_ascii_uppercase()).collect()
}

proptest! {
    #[test]
    fn prop_output_has_target_length(value in ".{0,64}", len in 0usize..80) {
        let field = format_field(&value, len);
        prop_assert_eq!(field.char_len(), len);
    }

    #[test]
    fn prop_short_values_are_padded(value in "[a-zA-Z0-9 \\-]{0,40}", extra in 0usize..20) {
        let len = value.chars().count() + extra;
        let field = format_field(&value, len);
        let expected = ascii_upper(&value);
        prop_assert!(!field.is_truncated());
        prop_assert!(field.as_str().starts_with(&expected));
        prop_assert!(field.as_str()[value.len()..].chars().all(|ch| ch == ' '));
        prop_assert_eq!(field.as_str().trim_end(), expected.trim_end());
    }

    #[test]
    fn prop_long_values_are_cut(value in "[a-zA-Z0-9 ]{1,60}", cut in 0usize..60) {
        prop_assume!(cut < value.len());
        let field = format_field(&value, cut);
        prop_assert!(field.is_truncated());
        let expected = ascii_upper(&value[..cut]);
        prop_assert_eq!(field.as_str(), expected);
    }

    #[test]
    fn prop_literals_survive_any_record(
        house in "\\PC{0,24}",
        street in "\\PC{0,48}",
        zip in "\\PC{0,9}",
        borough in proptest::option::of(0usize..5),
    ) {
        let record = AddressRecord::new(house, borough.map(|i| Borough::ALL[i]), street, zip);
        let encoded = encode_address(&record).expect("内置布局表不会越界");
        let wa1 = encoded.wa1().as_bytes();
        prop_assert_eq!(wa1.len(), 1200);
        prop_assert_eq!(&wa1[TRANSACTION_CODE_SLOT.range()], b"1B");
        prop_assert_eq!(&wa1[SECTION_CODE_SLOT.range()], b"C");
        prop_assert!(encoded.wa2().as_bytes().iter().all(|&byte| byte == b' '));
    }
}
