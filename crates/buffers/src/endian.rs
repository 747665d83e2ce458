//! Portable big-endian conversion.
//!
//! Every multi-byte numeric on the wire is big-endian regardless of host
//! order. The conversions go through `to_be_bytes`/`from_be_bytes`, so the
//! result is identical on little- and big-endian targets.

use crate::ByteSink;

/// Integers that have a fixed-width big-endian wire form.
pub trait BigEndian: Copy {
    /// Width in bytes of the wire form.
    const WIDTH: usize;

    /// Appends the big-endian bytes of `self` to `out`.
    fn write_be<S: ByteSink + ?Sized>(self, out: &mut S);

    /// Reads a value from the first `WIDTH` bytes of `bytes`.
    ///
    /// Returns `None` when fewer than `WIDTH` bytes are available.
    fn read_be(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_big_endian {
    ($($ty:ty => $width:expr),* $(,)?) => {$(
        impl BigEndian for $ty {
            const WIDTH: usize = $width;

            #[inline]
            fn write_be<S: ByteSink + ?Sized>(self, out: &mut S) {
                out.append(&self.to_be_bytes());
            }

            #[inline]
            fn read_be(bytes: &[u8]) -> Option<Self> {
                let head: [u8; $width] = bytes.get(..$width)?.try_into().ok()?;
                Some(<$ty>::from_be_bytes(head))
            }
        }
    )*};
}

impl_big_endian! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
}
