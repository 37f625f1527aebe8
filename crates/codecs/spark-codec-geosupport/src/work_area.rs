//! 工作区缓冲。
//!
//! # 教案定位（Why）
//! - 引擎通过 C ABI 原地改写两块定长字节缓冲；`WorkArea` 把“缓冲类型 + 固定长度”绑在一起，
//!   使长度契约在构造时就被校验，而不是等到引擎调用时才暴露。
//!
//! # 契约说明（What）
//! - 新建工作区以 ASCII 空格填满。
//! - 文本按“一字符一字节”写入：U+0000..=U+00FF 写入其 Latin-1 字节，其余字符写入 `?`；
//!   读取时每个字节按 Latin-1 还原为字符，因此读取永不因内容失败。

use alloc::{boxed::Box, string::String, vec, vec::Vec};

use crate::{
    error::CodecError,
    layout::{BufferKind, FieldSlot},
};

/// 不可表示字符的替代字节。
pub const REPLACEMENT_BYTE: u8 = b'?';

/// 一块定长工作区。
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WorkArea {
    kind: BufferKind,
    bytes: Box<[u8]>,
}

impl WorkArea {
    /// 构造以空格填满的工作区。
    #[must_use]
    pub fn blank(kind: BufferKind) -> Self {
        Self {
            kind,
            bytes: vec![b' '; kind.fixed_len()].into_boxed_slice(),
        }
    }

    /// 包装外部提供的字节，长度必须恰好等于缓冲类型的固定长度。
    pub fn from_vec(kind: BufferKind, bytes: Vec<u8>) -> Result<Self, CodecError> {
        if bytes.len() != kind.fixed_len() {
            return Err(CodecError::LengthMismatch {
                buffer: kind,
                expected: kind.fixed_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            kind,
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// 缓冲类型。
    #[must_use]
    pub const fn kind(&self) -> BufferKind {
        self.kind
    }

    /// 固定长度。
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// 工作区总是定长且非空，保留该方法以配合 `len`。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 只读字节视图。
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 可变字节视图，供引擎原地改写。长度不可变。
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// 取出底层字节。
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// 把 `text` 写入槽位：多余字符丢弃，不足部分补空格，恰好写满 `slot.len()` 字节。
    pub fn write_text(
        &mut self,
        field: &'static str,
        slot: FieldSlot,
        text: &str,
    ) -> Result<(), CodecError> {
        let target = self.slot_mut(field, slot)?;
        let mut chars = text.chars();
        for byte in target.iter_mut() {
            *byte = chars.next().map_or(b' ', char_to_byte);
        }
        Ok(())
    }

    /// 以 Latin-1 读取槽位的原始文本（不裁剪空白）。
    pub fn read_text(&self, field: &'static str, slot: FieldSlot) -> Result<String, CodecError> {
        if !slot.fits(self.bytes.len()) {
            return Err(self.out_of_bounds(field, slot));
        }
        Ok(latin1_to_string(&self.bytes[slot.range()]))
    }

    fn slot_mut(&mut self, field: &'static str, slot: FieldSlot) -> Result<&mut [u8], CodecError> {
        if !slot.fits(self.bytes.len()) {
            return Err(self.out_of_bounds(field, slot));
        }
        Ok(&mut self.bytes[slot.range()])
    }

    fn out_of_bounds(&self, field: &'static str, slot: FieldSlot) -> CodecError {
        CodecError::LayoutViolation {
            buffer: self.kind,
            field: Some(field),
            required: slot.end(),
            actual: self.bytes.len(),
        }
    }
}

impl AsRef<[u8]> for WorkArea {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl core::fmt::Debug for WorkArea {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let used = self
            .bytes
            .iter()
            .rposition(|&byte| byte != b' ')
            .map_or(0, |last| last + 1);
        f.debug_struct("WorkArea")
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .field("text", &latin1_to_string(&self.bytes[..used]))
            .finish()
    }
}

/// 单字符到单字节的映射。
pub(crate) fn char_to_byte(ch: char) -> u8 {
    u8::try_from(u32::from(ch)).unwrap_or(REPLACEMENT_BYTE)
}

/// 按 Latin-1 把字节还原为文本。
#[must_use]
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{WA1_LEN, WA2_LEN};

    #[test]
    fn blank_work_areas_have_fixed_length() {
        let wa1 = WorkArea::blank(BufferKind::InputOutput);
        let wa2 = WorkArea::blank(BufferKind::OutputOnly);
        assert_eq!(wa1.len(), WA1_LEN);
        assert_eq!(wa2.len(), WA2_LEN);
        assert!(wa2.as_bytes().iter().all(|&byte| byte == b' '));
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = WorkArea::from_vec(BufferKind::OutputOnly, vec![b' '; 10])
            .expect_err("长度不符必须报错");
        assert_eq!(
            err,
            CodecError::LengthMismatch {
                buffer: BufferKind::OutputOnly,
                expected: WA2_LEN,
                actual: 10,
            }
        );
    }

    #[test]
    fn write_text_pads_truncates_and_replaces() {
        let mut wa = WorkArea::blank(BufferKind::InputOutput);
        let slot = FieldSlot::new(4, 4);
        wa.write_text("sample", slot, "AB").expect("槽位在界内");
        assert_eq!(&wa.as_bytes()[4..8], b"AB  ");

        wa.write_text("sample", slot, "É€XYZ").expect("槽位在界内");
        assert_eq!(&wa.as_bytes()[4..8], &[0xC9, b'?', b'X', b'Y']);
        assert_eq!(wa.read_text("sample", slot).expect("槽位在界内"), "É?XY");
    }

    #[test]
    fn write_outside_buffer_is_rejected() {
        let mut wa = WorkArea::blank(BufferKind::InputOutput);
        let err = wa
            .write_text("sample", FieldSlot::new(WA1_LEN - 1, 2), "XX")
            .expect_err("越界写入必须报错");
        assert_eq!(
            err,
            CodecError::LayoutViolation {
                buffer: BufferKind::InputOutput,
                field: Some("sample"),
                required: WA1_LEN + 1,
                actual: WA1_LEN,
            }
        );
    }

    #[test]
    fn overflowing_slot_is_a_layout_violation() {
        let mut wa = WorkArea::blank(BufferKind::OutputOnly);
        let slot = FieldSlot::new(usize::MAX, 2);

        let err = wa.write_text("far", slot, "XX").expect_err("溢出的槽位必须报错");
        assert_eq!(
            err,
            CodecError::LayoutViolation {
                buffer: BufferKind::OutputOnly,
                field: Some("far"),
                required: usize::MAX,
                actual: WA2_LEN,
            }
        );
        assert!(wa.read_text("far", slot).is_err());
        assert!(wa.as_bytes().iter().all(|&byte| byte == b' '));
    }
}
