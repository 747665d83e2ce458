//! Decoding over a source that grows chunk by chunk.

use super::decoder::{unpack, Stop};
use super::error::MsgPackError;
use super::visitor::MsgPackVisitor;
use crate::hex::hexify;

/// Bytes of the offending input shown in the unsupported-tag warning.
const PREVIEW_LEN: usize = 16;

/// Buffers chunks and decodes every complete value as soon as it arrives.
///
/// Bytes belonging to an incomplete value stay pending until the next
/// [`push`](MsgPackStream::push) supplies the rest.
///
/// ```
/// use logpack::{MsgPackStream, MsgPackVisitor};
///
/// #[derive(Default)]
/// struct Sum(i64);
/// impl MsgPackVisitor for Sum {
///     fn on_int(&mut self, v: i32) { self.0 += v as i64; }
/// }
///
/// let mut stream = MsgPackStream::new();
/// let mut sum = Sum::default();
/// stream.push(&[0x01, 0xd1, 0x01]);
/// assert_eq!(stream.drain(&mut sum), Ok(1));
/// stream.push(&[0x00]);
/// assert_eq!(stream.drain(&mut sum), Ok(3));
/// assert_eq!(sum.0, 257);
/// assert!(stream.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MsgPackStream {
    pending: Vec<u8>,
    /// Absolute stream offset of `pending[0]`.
    offset: usize,
}

impl MsgPackStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Vec::with_capacity(capacity),
            offset: 0,
        }
    }

    /// Appends a chunk read from the source.
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Decodes every complete pending value into `visitor` and returns the
    /// number of bytes consumed by this call.
    ///
    /// An unsupported tag is reported with its absolute offset in the stream;
    /// values before it have already been visited and dropped from the
    /// pending buffer.
    pub fn drain<V: MsgPackVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<usize, MsgPackError> {
        let out = unpack(&self.pending, visitor);
        let base = self.offset;
        self.pending.drain(..out.consumed);
        self.offset += out.consumed;
        match out.stop {
            Stop::Exhausted => Ok(out.consumed),
            Stop::NeedMoreData => {
                tracing::trace!(
                    consumed = out.consumed,
                    pending = self.pending.len(),
                    "msgpack stream waiting for more data"
                );
                Ok(out.consumed)
            }
            Stop::Invalid(err) => {
                let err = err.shifted(base);
                let preview = &self.pending[..self.pending.len().min(PREVIEW_LEN)];
                tracing::warn!(
                    offset = self.offset,
                    bytes = %hexify(preview),
                    "unsupported msgpack tag"
                );
                Err(err)
            }
        }
    }

    /// Bytes received but not yet decoded.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Absolute offset of the first pending byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Strings(Vec<Vec<u8>>);

    impl MsgPackVisitor for Strings {
        fn on_string(&mut self, bytes: &[u8]) {
            self.0.push(bytes.to_vec());
        }
    }

    #[test]
    fn string_split_across_chunks() {
        let mut stream = MsgPackStream::new();
        let mut seen = Strings::default();
        stream.push(&[0xd9, 0x03, b'a']);
        assert_eq!(stream.drain(&mut seen), Ok(0));
        assert_eq!(stream.pending(), [0xd9, 0x03, b'a']);
        stream.push(b"bc");
        assert_eq!(stream.drain(&mut seen), Ok(5));
        assert_eq!(seen.0, [b"abc".to_vec()]);
        assert!(stream.is_empty());
        assert_eq!(stream.offset(), 5);
    }

    #[test]
    fn invalid_tag_reports_absolute_offset() {
        let mut stream = MsgPackStream::new();
        let mut seen = Strings::default();
        stream.push(&[0xa1, b'x', 0xa1]);
        assert_eq!(stream.drain(&mut seen), Ok(2));
        stream.push(&[b'y', 0xc4, 0x00]);
        assert_eq!(
            stream.drain(&mut seen),
            Err(MsgPackError::UnsupportedTag { tag: 0xc4, offset: 4 })
        );
        assert_eq!(seen.0.len(), 2);
        assert_eq!(stream.pending(), [0xc4, 0x00]);
    }
}
