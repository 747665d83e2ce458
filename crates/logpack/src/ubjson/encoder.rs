//! Chaining UBJSON encoder.
//!
//! Containers are written as plain start/end markers; nothing tracks whether
//! they balance, and object keys are not validated. Callers own the grammar.

use logpack_buffers::{ByteSink, Writer};

use super::constants::*;
use super::error::UbjsonError;
use crate::config::CodecConfig;

/// Writes UBJSON values into a [`ByteSink`].
///
/// ```
/// use logpack::UbjsonEncoder;
///
/// let mut enc = UbjsonEncoder::new();
/// enc.start_object()
///     .write_name_value("n", &1)?
///     .start_sub_list("xs")
///     .end_list()
///     .end_object();
/// assert_eq!(enc.flush(), b"{i\x01ni\x01i\x02xs[]}");
/// # Ok::<(), logpack::UbjsonError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct UbjsonEncoder<S: ByteSink = Writer> {
    sink: S,
}

impl UbjsonEncoder<Writer> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CodecConfig) -> Self {
        Self::from_sink(Writer::with_capacity(config.writer_capacity))
    }

    pub fn flush(&mut self) -> Vec<u8> {
        self.sink.flush()
    }
}

impl<S: ByteSink> UbjsonEncoder<S> {
    pub fn from_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn start_object(&mut self) -> &mut Self {
        self.marker(OBJECT_START)
    }

    pub fn end_object(&mut self) -> &mut Self {
        self.marker(OBJECT_END)
    }

    pub fn start_list(&mut self) -> &mut Self {
        self.marker(ARRAY_START)
    }

    pub fn end_list(&mut self) -> &mut Self {
        self.marker(ARRAY_END)
    }

    /// Writes `name` as a key, then opens an object.
    pub fn start_sub_object(&mut self, name: &str) -> &mut Self {
        self.write_name(name).start_object()
    }

    /// Writes `name` as a key, then opens a list.
    pub fn start_sub_list(&mut self, name: &str) -> &mut Self {
        self.write_name(name).start_list()
    }

    pub fn write_null(&mut self) -> &mut Self {
        self.marker(NULL)
    }

    pub fn write_bool(&mut self, val: bool) -> &mut Self {
        self.marker(if val { TRUE } else { FALSE })
    }

    pub fn write_char(&mut self, val: u8) -> &mut Self {
        self.sink.append(&[CHAR, val]);
        self
    }

    pub fn write_int8(&mut self, val: i8) -> &mut Self {
        self.sink.append(&[INT8, val as u8]);
        self
    }

    pub fn write_uint8(&mut self, val: u8) -> &mut Self {
        self.sink.append(&[UINT8, val]);
        self
    }

    pub fn write_int16(&mut self, val: i16) -> &mut Self {
        self.sink.u8u16(INT16, val as u16);
        self
    }

    pub fn write_int32(&mut self, val: i32) -> &mut Self {
        self.sink.u8u32(INT32, val as u32);
        self
    }

    pub fn write_int64(&mut self, val: i64) -> &mut Self {
        self.sink.u8u64(INT64, val as u64);
        self
    }

    /// Writes an integer with the smallest marker that holds it.
    ///
    /// Non-negative values try int8, uint8, int16, int32, int64 in that
    /// order; negative values skip uint8.
    pub fn write_integer(&mut self, val: i64) -> &mut Self {
        if val >= 0 {
            if val <= i8::MAX as i64 {
                self.write_int8(val as i8)
            } else if val <= u8::MAX as i64 {
                self.write_uint8(val as u8)
            } else if val <= i16::MAX as i64 {
                self.write_int16(val as i16)
            } else if val <= i32::MAX as i64 {
                self.write_int32(val as i32)
            } else {
                self.write_int64(val)
            }
        } else if val >= i8::MIN as i64 {
            self.write_int8(val as i8)
        } else if val >= i16::MIN as i64 {
            self.write_int16(val as i16)
        } else if val >= i32::MIN as i64 {
            self.write_int32(val as i32)
        } else {
            self.write_int64(val)
        }
    }

    /// Like [`write_integer`](Self::write_integer) for unsigned input.
    pub fn write_unsigned(&mut self, val: u64) -> Result<&mut Self, UbjsonError> {
        let val = i64::try_from(val).map_err(|_| UbjsonError::UnsupportedBigNumber(val))?;
        Ok(self.write_integer(val))
    }

    /// Writes a float32 in network byte order.
    pub fn write_float(&mut self, val: f32) -> &mut Self {
        self.sink.u8f32(FLOAT32, val);
        self
    }

    /// Writes a float64 in network byte order.
    pub fn write_double(&mut self, val: f64) -> &mut Self {
        self.sink.u8f64(FLOAT64, val);
        self
    }

    pub fn write_string(&mut self, val: &str) -> &mut Self {
        self.sink.append_byte(STRING);
        self.write_len_prefixed(val.as_bytes())
    }

    /// Writes an object key: the length-prefixed bytes without the `S` marker.
    pub fn write_name(&mut self, name: &str) -> &mut Self {
        self.write_len_prefixed(name.as_bytes())
    }

    pub fn write_value<V: UbjsonValue + ?Sized>(&mut self, val: &V) -> Result<&mut Self, UbjsonError> {
        val.write_ubjson(self)?;
        Ok(self)
    }

    /// Writes `name` as a key followed by `val`. Nothing is written if the
    /// value is rejected.
    pub fn write_name_value<V: UbjsonValue + ?Sized>(
        &mut self,
        name: &str,
        val: &V,
    ) -> Result<&mut Self, UbjsonError> {
        val.check_ubjson()?;
        self.write_name(name).write_value(val)
    }

    fn write_len_prefixed(&mut self, bytes: &[u8]) -> &mut Self {
        // Slice lengths never exceed isize::MAX.
        self.write_integer(bytes.len() as i64);
        self.sink.append(bytes);
        self
    }

    fn marker(&mut self, marker: u8) -> &mut Self {
        self.sink.append_byte(marker);
        self
    }
}

/// Values with a natural UBJSON encoding.
pub trait UbjsonValue {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError>;

    /// Fails exactly when `write_ubjson` would, without writing anything.
    fn check_ubjson(&self) -> Result<(), UbjsonError> {
        Ok(())
    }
}

macro_rules! ubjson_signed {
    ($($ty:ty),*) => {$(
        impl UbjsonValue for $ty {
            fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
                enc.write_integer(*self as i64);
                Ok(())
            }
        }
    )*};
}

macro_rules! ubjson_unsigned {
    ($($ty:ty),*) => {$(
        impl UbjsonValue for $ty {
            fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
                enc.write_unsigned(*self as u64).map(|_| ())
            }

            fn check_ubjson(&self) -> Result<(), UbjsonError> {
                let val = *self as u64;
                i64::try_from(val)
                    .map(|_| ())
                    .map_err(|_| UbjsonError::UnsupportedBigNumber(val))
            }
        }
    )*};
}

ubjson_signed!(i8, i16, i32, i64, isize);
ubjson_unsigned!(u8, u16, u32, u64, usize);

/// Characters are written as their code point.
impl UbjsonValue for char {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        enc.write_integer(*self as i64);
        Ok(())
    }
}

impl UbjsonValue for bool {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        enc.write_bool(*self);
        Ok(())
    }
}

impl UbjsonValue for () {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        enc.write_null();
        Ok(())
    }
}

impl UbjsonValue for f32 {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        enc.write_float(*self);
        Ok(())
    }
}

impl UbjsonValue for f64 {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        enc.write_double(*self);
        Ok(())
    }
}

impl UbjsonValue for str {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        enc.write_string(self);
        Ok(())
    }
}

impl UbjsonValue for String {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        enc.write_string(self);
        Ok(())
    }
}

impl<T: UbjsonValue + ?Sized> UbjsonValue for &T {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        (**self).write_ubjson(enc)
    }

    fn check_ubjson(&self) -> Result<(), UbjsonError> {
        (**self).check_ubjson()
    }
}

impl<T: UbjsonValue> UbjsonValue for Option<T> {
    fn write_ubjson<S: ByteSink>(&self, enc: &mut UbjsonEncoder<S>) -> Result<(), UbjsonError> {
        match self {
            Some(v) => v.write_ubjson(enc),
            None => {
                enc.write_null();
                Ok(())
            }
        }
    }

    fn check_ubjson(&self) -> Result<(), UbjsonError> {
        self.as_ref().map_or(Ok(()), T::check_ubjson)
    }
}
