//! The raw byte sink every encoder writes into.

use crate::BigEndian;

/// Append-only destination for encoded bytes.
///
/// Implementations must append `bytes` in order and must not reorder or
/// drop anything; encoders rely on this to keep tag and payload adjacent.
pub trait ByteSink {
    fn append(&mut self, bytes: &[u8]);

    #[inline]
    fn append_byte(&mut self, byte: u8) {
        self.append(&[byte]);
    }

    /// Writes a tag byte followed by a big-endian u16.
    #[inline]
    fn u8u16(&mut self, tag: u8, val: u16) {
        self.append_byte(tag);
        val.write_be(self);
    }

    /// Writes a tag byte followed by a big-endian u32.
    #[inline]
    fn u8u32(&mut self, tag: u8, val: u32) {
        self.append_byte(tag);
        val.write_be(self);
    }

    /// Writes a tag byte followed by a big-endian u64.
    #[inline]
    fn u8u64(&mut self, tag: u8, val: u64) {
        self.append_byte(tag);
        val.write_be(self);
    }

    /// Writes a tag byte followed by the big-endian bits of an f32.
    #[inline]
    fn u8f32(&mut self, tag: u8, val: f32) {
        self.u8u32(tag, val.to_bits());
    }

    /// Writes a tag byte followed by the big-endian bits of an f64.
    #[inline]
    fn u8f64(&mut self, tag: u8, val: f64) {
        self.u8u64(tag, val.to_bits());
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    #[inline]
    fn append_byte(&mut self, byte: u8) {
        self.push(byte);
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    #[inline]
    fn append(&mut self, bytes: &[u8]) {
        (**self).append(bytes);
    }

    #[inline]
    fn append_byte(&mut self, byte: u8) {
        (**self).append_byte(byte);
    }
}
