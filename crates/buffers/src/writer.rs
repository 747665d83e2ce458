//! Growable append-only byte buffer.

use crate::ByteSink;

/// A byte buffer that grows as encoders append to it.
///
/// Bytes are only ever appended. [`flush`](Writer::flush) hands out
/// everything written since the previous flush, and
/// [`truncate`](Writer::truncate) rolls back a partially written entry.
///
/// # Example
///
/// ```
/// use logpack_buffers::{ByteSink, Writer};
///
/// let mut writer = Writer::new();
/// writer.append_byte(0x01);
/// writer.u8u16(0xcd, 0x0203);
/// assert_eq!(writer.flush(), [0x01, 0xcd, 0x02, 0x03]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Writer {
    buf: Vec<u8>,
    /// Position where the last flush happened.
    x0: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer that can hold `capacity` bytes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            x0: 0,
        }
    }

    /// Total number of bytes held, flushed or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Everything written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes written since the last flush.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf[self.x0..]
    }

    /// Discards bytes past `len`. Used to undo a partially written entry.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
        self.x0 = self.x0.min(len);
    }

    /// Returns the bytes written since the last flush and advances the mark.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.buf[self.x0..].to_vec();
        self.x0 = self.buf.len();
        out
    }

    /// Consumes the writer, returning every byte it holds.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Writes raw bytes.
    #[inline]
    pub fn buf(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

impl ByteSink for Writer {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    fn append_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_numerics_are_big_endian() {
        let mut writer = Writer::with_capacity(2);
        writer.append_byte(0x7e);
        writer.u8u16(0xcd, 0xa1b2);
        writer.u8u32(0xd2, (-129i32) as u32);
        assert_eq!(
            writer.flush(),
            [0x7e, 0xcd, 0xa1, 0xb2, 0xd2, 0xff, 0xff, 0xff, 0x7f]
        );
    }

    #[test]
    fn test_flush_hands_out_only_new_bytes() {
        let mut writer = Writer::new();
        writer.buf(&[0xff; 4]);
        assert_eq!(writer.flush(), [0xff; 4]);
        writer.u8u64(0xcf, 5);
        assert_eq!(writer.pending(), [0xcf, 0, 0, 0, 0, 0, 0, 0, 5]);
        assert_eq!(writer.flush().len(), 9);
        assert!(writer.flush().is_empty());
        assert_eq!(writer.len(), 13);
    }

    #[test]
    fn test_u8f64_is_big_endian() {
        let mut writer = Writer::new();
        writer.u8f64(0xcb, 0.1);
        let data = writer.flush();
        assert_eq!(data[0], 0xcb);
        assert_eq!(&data[1..], 0.1f64.to_be_bytes());
    }

    #[test]
    fn test_truncate_rolls_back_unflushed_bytes() {
        let mut writer = Writer::new();
        writer.append_byte(0x01);
        let mark = writer.len();
        writer.u8u32(0xce, 0xdead_beef);
        writer.truncate(mark);
        assert_eq!(writer.as_slice(), [0x01]);
        assert_eq!(writer.pending(), [0x01]);
    }

    #[test]
    fn test_truncate_below_flush_mark() {
        let mut writer = Writer::new();
        writer.buf(&[0x01, 0x02]);
        writer.flush();
        writer.truncate(1);
        assert!(writer.pending().is_empty());
        writer.append_byte(0x09);
        assert_eq!(writer.flush(), [0x09]);
    }

    #[test]
    fn test_into_vec_keeps_flushed_bytes() {
        let mut writer = Writer::new();
        writer.buf(b"ab");
        writer.flush();
        writer.buf(b"c");
        assert_eq!(writer.into_vec(), b"abc");
    }
}
