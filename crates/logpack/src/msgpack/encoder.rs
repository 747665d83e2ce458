//! Minimal-width MessagePack encoder.

use logpack_buffers::{ByteSink, Writer};

use super::constants::*;
use super::error::MsgPackError;
use super::value::Value;
use crate::config::CodecConfig;

/// Encodes primitives into a [`ByteSink`], always choosing the smallest tag
/// that holds the value losslessly.
///
/// Signed and unsigned integers take independent paths: `write_uint` never
/// emits a negative fixint or a signed tag, `write_int` never emits an
/// unsigned tag.
///
/// ```
/// use logpack::MsgPackEncoder;
///
/// let mut enc = MsgPackEncoder::new();
/// enc.write_int(-1);
/// enc.write_uint(128);
/// assert_eq!(enc.flush(), [0xff, 0xcc, 0x80]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MsgPackEncoder<S: ByteSink = Writer> {
    sink: S,
}

impl MsgPackEncoder<Writer> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CodecConfig) -> Self {
        Self::from_sink(Writer::with_capacity(config.writer_capacity))
    }

    /// Returns the bytes encoded since the previous flush.
    pub fn flush(&mut self) -> Vec<u8> {
        self.sink.flush()
    }
}

impl<S: ByteSink> MsgPackEncoder<S> {
    pub fn from_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn write_nil(&mut self) {
        self.sink.append_byte(NIL);
    }

    pub fn write_bool(&mut self, val: bool) {
        self.sink.append_byte(if val { TRUE } else { FALSE });
    }

    pub fn write_int(&mut self, val: i64) {
        if (0..=POSITIVE_FIXINT_MAX as i64).contains(&val) || (-32..0).contains(&val) {
            self.sink.append_byte(val as u8);
        } else if val >= i8::MIN as i64 && val < 0 {
            self.write_int8(val as i8);
        } else if val >= i16::MIN as i64 && val <= i16::MAX as i64 {
            self.write_int16(val as i16);
        } else if val >= i32::MIN as i64 && val <= i32::MAX as i64 {
            self.write_int32(val as i32);
        } else {
            self.write_int64(val);
        }
    }

    pub fn write_uint(&mut self, val: u64) {
        if val <= POSITIVE_FIXINT_MAX as u64 {
            self.sink.append_byte(val as u8);
        } else if val <= u8::MAX as u64 {
            self.write_uint8(val as u8);
        } else if val <= u16::MAX as u64 {
            self.write_uint16(val as u16);
        } else if val <= u32::MAX as u64 {
            self.write_uint32(val as u32);
        } else {
            self.write_uint64(val);
        }
    }

    pub fn write_int8(&mut self, val: i8) {
        self.sink.append(&[INT8, val as u8]);
    }

    pub fn write_int16(&mut self, val: i16) {
        self.sink.u8u16(INT16, val as u16);
    }

    pub fn write_int32(&mut self, val: i32) {
        self.sink.u8u32(INT32, val as u32);
    }

    pub fn write_int64(&mut self, val: i64) {
        self.sink.u8u64(INT64, val as u64);
    }

    pub fn write_uint8(&mut self, val: u8) {
        self.sink.append(&[UINT8, val]);
    }

    pub fn write_uint16(&mut self, val: u16) {
        self.sink.u8u16(UINT16, val);
    }

    pub fn write_uint32(&mut self, val: u32) {
        self.sink.u8u32(UINT32, val);
    }

    pub fn write_uint64(&mut self, val: u64) {
        self.sink.u8u64(UINT64, val);
    }

    /// Writes a float32 without narrowing or widening.
    pub fn write_float32(&mut self, val: f32) {
        self.sink.u8f32(FLOAT32, val);
    }

    pub fn write_float64(&mut self, val: f64) {
        self.sink.u8f64(FLOAT64, val);
    }

    pub fn write_str(&mut self, val: &str) -> Result<(), MsgPackError> {
        self.write_str_bytes(val.as_bytes())
    }

    /// Writes `bytes` as a string. The bytes are copied verbatim; nothing
    /// checks that they are UTF-8.
    pub fn write_str_bytes(&mut self, bytes: &[u8]) -> Result<(), MsgPackError> {
        let len = bytes.len();
        if len <= FIXSTR_MAX_LEN {
            self.sink.append_byte(FIXSTR | len as u8);
        } else if len <= u8::MAX as usize {
            self.sink.append(&[STR8, len as u8]);
        } else if len <= u16::MAX as usize {
            self.sink.u8u16(STR16, len as u16);
        } else {
            let len = u32::try_from(len).map_err(|_| MsgPackError::LengthOverflow(len))?;
            self.sink.u8u32(STR32, len);
        }
        self.sink.append(bytes);
        Ok(())
    }

    /// Writes an array header. The `len` elements must follow.
    pub fn write_array_header(&mut self, len: u32) {
        self.write_container_header(len, FIXARRAY, ARRAY16, ARRAY32);
    }

    /// Writes a map header. `len` key/value pairs must follow.
    pub fn write_map_header(&mut self, len: u32) {
        self.write_container_header(len, FIXMAP, MAP16, MAP32);
    }

    // Arrays and maps have no 8-bit tier.
    fn write_container_header(&mut self, len: u32, fix: u8, tag16: u8, tag32: u8) {
        if len <= FIXCONTAINER_MAX_LEN {
            self.sink.append_byte(fix | len as u8);
        } else if len <= u16::MAX as u32 {
            self.sink.u8u16(tag16, len as u16);
        } else {
            self.sink.u8u32(tag32, len);
        }
    }

    /// Re-encodes a decoded value.
    ///
    /// Integers go through the minimal-width path, so a value decoded from an
    /// oversized tag comes back out smaller.
    pub fn write_value(&mut self, value: &Value<'_>) -> Result<(), MsgPackError> {
        match *value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_bool(b),
            Value::Int(v) => self.write_int(v as i64),
            Value::UInt(v) => self.write_uint(v as u64),
            Value::LongLong(v) => self.write_int(v),
            Value::ULongLong(v) => self.write_uint(v),
            Value::Float(v) => self.write_float32(v),
            Value::Double(v) => self.write_float64(v),
            Value::Str(bytes) => self.write_str_bytes(bytes)?,
            Value::Array(n) => self.write_array_header(n),
            Value::Map(n) => self.write_map_header(n),
        }
        Ok(())
    }
}
