//! Single-pass resumable MessagePack decoder.
//!
//! Decoding never copies: string payloads are sub-slices of the input. When
//! the input ends in the middle of a value the decoder reports
//! [`DecodeStep::NeedMoreData`] having consumed nothing, so the caller can
//! append bytes and decode again from the same position.

use logpack_buffers::{BufferError, Reader};

use super::constants::*;
use super::error::MsgPackError;
use super::value::Value;
use super::visitor::MsgPackVisitor;

/// Outcome of decoding one value from the front of a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodeStep<'a> {
    /// A complete value spanning the first `n` bytes.
    Consumed(usize, Value<'a>),
    /// The buffer ends inside the next value. Nothing was consumed.
    NeedMoreData,
    /// The leading byte is not a supported tag.
    Invalid(MsgPackError),
}

/// Why [`unpack`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Every byte was decoded.
    Exhausted,
    /// The tail holds an incomplete value.
    NeedMoreData,
    /// Decoding hit an unsupported tag; `offset` is relative to the buffer
    /// passed to `unpack`.
    Invalid(MsgPackError),
}

/// Result of an [`unpack`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unpacked {
    /// Bytes covered by complete, visited values.
    pub consumed: usize,
    pub stop: Stop,
}

impl Unpacked {
    /// True when the whole buffer decoded cleanly.
    pub fn is_exhausted(&self) -> bool {
        self.stop == Stop::Exhausted
    }
}

/// Decodes the value at the front of `buf`.
///
/// ```
/// use logpack::{decode_one, DecodeStep, Value};
///
/// assert_eq!(decode_one(&[0xcd, 0x01]), DecodeStep::NeedMoreData);
/// assert_eq!(decode_one(&[0xcd, 0x01, 0x00]), DecodeStep::Consumed(3, Value::UInt(256)));
/// ```
pub fn decode_one(buf: &[u8]) -> DecodeStep<'_> {
    let mut reader = Reader::new(buf);
    let tag = match reader.u8() {
        Ok(tag) => tag,
        Err(_) => return DecodeStep::NeedMoreData,
    };
    match read_payload(tag, &mut reader) {
        Ok(Some(value)) => DecodeStep::Consumed(reader.position(), value),
        Ok(None) => DecodeStep::Invalid(MsgPackError::UnsupportedTag { tag, offset: 0 }),
        Err(_) => DecodeStep::NeedMoreData,
    }
}

/// Reads the payload that follows `tag`. `Ok(None)` means the tag is not
/// part of the supported subset.
fn read_payload<'a>(tag: u8, r: &mut Reader<'a>) -> Result<Option<Value<'a>>, BufferError> {
    let value = match tag {
        0x00..=POSITIVE_FIXINT_MAX => Value::Int(tag as i32),
        0x80..=0x8f => Value::Map((tag & 0x0f) as u32),
        0x90..=0x9f => Value::Array((tag & 0x0f) as u32),
        0xa0..=0xbf => Value::Str(r.buf((tag & 0x1f) as usize)?),
        NIL => Value::Nil,
        FALSE => Value::Bool(false),
        TRUE => Value::Bool(true),
        FLOAT32 => Value::Float(r.f32()?),
        FLOAT64 => Value::Double(r.f64()?),
        UINT8 => Value::UInt(r.u8()? as u32),
        UINT16 => Value::UInt(r.u16()? as u32),
        UINT32 => Value::UInt(r.u32()?),
        UINT64 => Value::ULongLong(r.u64()?),
        INT8 => Value::Int(r.i8()? as i32),
        INT16 => Value::Int(r.i16()? as i32),
        INT32 => Value::Int(r.i32()?),
        INT64 => Value::LongLong(r.i64()?),
        STR8 => {
            let len = r.u8()? as usize;
            Value::Str(r.buf(len)?)
        }
        STR16 => {
            let len = r.u16()? as usize;
            Value::Str(r.buf(len)?)
        }
        STR32 => {
            let len = r.u32()? as usize;
            Value::Str(r.buf(len)?)
        }
        ARRAY16 => Value::Array(r.u16()? as u32),
        ARRAY32 => Value::Array(r.u32()?),
        MAP16 => Value::Map(r.u16()? as u32),
        MAP32 => Value::Map(r.u32()?),
        NEGATIVE_FIXINT..=0xff => Value::Int(tag as i8 as i32),
        // 0xc1, bin, ext, fixext
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// Decodes values from `buf` until it is exhausted or decoding cannot
/// proceed, dispatching each one to `visitor`.
///
/// `consumed` counts only complete values, so trailing garbage or an
/// incomplete tail is always detectable by the caller.
pub fn unpack<V: MsgPackVisitor + ?Sized>(buf: &[u8], visitor: &mut V) -> Unpacked {
    let mut consumed = 0;
    while consumed < buf.len() {
        match decode_one(&buf[consumed..]) {
            DecodeStep::Consumed(n, value) => {
                value.accept(visitor);
                consumed += n;
            }
            DecodeStep::NeedMoreData => {
                return Unpacked {
                    consumed,
                    stop: Stop::NeedMoreData,
                }
            }
            DecodeStep::Invalid(err) => {
                return Unpacked {
                    consumed,
                    stop: Stop::Invalid(err.shifted(consumed)),
                }
            }
        }
    }
    Unpacked {
        consumed,
        stop: Stop::Exhausted,
    }
}
