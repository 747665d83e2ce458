//! Bounds-checked cursor over a borrowed byte slice.

use crate::{BigEndian, BufferError};

/// Reads big-endian numerics and sub-slices from a borrowed buffer.
///
/// Every read is bounds-checked and leaves the cursor untouched on failure,
/// so a caller that hits [`BufferError::EndOfBuffer`] can retry from the same
/// position once more bytes are available. Nothing is copied: [`buf`]
/// returns a view into the original slice.
///
/// [`buf`]: Reader::buf
///
/// # Example
///
/// ```
/// use logpack_buffers::{BufferError, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
/// assert_eq!(reader.u8(), Ok(0x01));
/// assert_eq!(reader.u16(), Ok(0x0203));
/// assert_eq!(reader.u8(), Err(BufferError::EndOfBuffer));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    data: &'a [u8],
    x: usize,
}

macro_rules! read_be {
    ($($name:ident -> $ty:ty),*) => {$(
        #[inline]
        pub fn $name(&mut self) -> Result<$ty, BufferError> {
            let val = <$ty as BigEndian>::read_be(&self.data[self.x..]).ok_or(BufferError::EndOfBuffer)?;
            self.x += <$ty as BigEndian>::WIDTH;
            Ok(val)
        }
    )*};
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0 }
    }

    /// Current cursor offset from the start of the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.x
    }

    /// Number of bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining() {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Returns the byte at the cursor without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.data.get(self.x).copied().ok_or(BufferError::EndOfBuffer)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        let val = self.peek()?;
        self.x += 1;
        Ok(val)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        self.u8().map(|b| b as i8)
    }

    read_be!(u16 -> u16, i16 -> i16, u32 -> u32, i32 -> i32, u64 -> u64, i64 -> i64);

    /// Reads an IEEE-754 single from its big-endian bit pattern.
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.u32().map(f32::from_bits)
    }

    /// Reads an IEEE-754 double from its big-endian bit pattern.
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.u64().map(f64::from_bits)
    }

    /// Returns the next `size` bytes as a view into the buffer.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.data[start..self.x])
    }
}
