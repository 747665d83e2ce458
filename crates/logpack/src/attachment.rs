//! Append-only name/value container for log record fields.
//!
//! An [`Attachment`] owns a MessagePack map body without its header: `len()`
//! string names, each followed by one scalar value. Entries are written
//! straight into the buffer by [`Attachment::add`] and replayed by
//! [`Attachment::visit`].

use std::str;

use logpack_buffers::{ByteSink, Writer};
use thiserror::Error;

use crate::config::CodecConfig;
use crate::json::{JsonBuilder, JsonBuilderError, JsonDump};
use crate::msgpack::{decode_one, DecodeStep, MsgPackEncoder, MsgPackError, Value};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("field {index}: name at offset {offset} is not a string")]
    NameNotString { index: usize, offset: usize },
    #[error("field {index}: value at offset {offset} is a container")]
    UnexpectedContainer { index: usize, offset: usize },
    #[error("attachment body truncated after {consumed} of {len} bytes")]
    Truncated { consumed: usize, len: usize },
    #[error("attachment holds {found} field(s), expected {expected}")]
    CountMismatch { expected: usize, found: usize },
    #[error("field {index}: string is not valid UTF-8")]
    InvalidUtf8 { index: usize },
    #[error("document does not start with a map header (found {kind})")]
    NotAMap { kind: &'static str },
    #[error("decode: {0}")]
    Decode(MsgPackError),
    #[error("encode: {0}")]
    Encode(MsgPackError),
}

/// A decoded field value. Mirrors the scalar variants of [`Value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int(i32),
    UInt(u32),
    LongLong(i64),
    ULongLong(u64),
    Float(f32),
    Double(f64),
    Str(&'a str),
    Bool(bool),
    Nil,
}

/// Receives each field of an attachment in insertion order.
pub trait AttachmentVisitor {
    fn visit_field(&mut self, name: &str, value: FieldValue<'_>);
}

impl<F: FnMut(&str, FieldValue<'_>)> AttachmentVisitor for F {
    fn visit_field(&mut self, name: &str, value: FieldValue<'_>) {
        self(name, value)
    }
}

/// Values that can be stored in an attachment.
///
/// Integers keep their signedness on the wire and `bool` only ever produces
/// the boolean tags, so a field never changes kind between `add` and `visit`.
pub trait AttachmentValue {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError>;
}

macro_rules! attachment_int {
    ($method:ident as $wide:ty => $($ty:ty),*) => {$(
        impl AttachmentValue for $ty {
            fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
                enc.$method(*self as $wide);
                Ok(())
            }
        }
    )*};
}

attachment_int!(write_int as i64 => i8, i16, i32, i64, isize);
attachment_int!(write_uint as u64 => u8, u16, u32, u64, usize);

impl AttachmentValue for bool {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
        enc.write_bool(*self);
        Ok(())
    }
}

impl AttachmentValue for f32 {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
        enc.write_float32(*self);
        Ok(())
    }
}

impl AttachmentValue for f64 {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
        enc.write_float64(*self);
        Ok(())
    }
}

impl AttachmentValue for str {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
        enc.write_str(self)
    }
}

impl AttachmentValue for String {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
        enc.write_str(self)
    }
}

impl<T: AttachmentValue + ?Sized> AttachmentValue for &T {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
        (**self).encode(enc)
    }
}

impl<T: AttachmentValue> AttachmentValue for Option<T> {
    fn encode<S: ByteSink>(&self, enc: &mut MsgPackEncoder<S>) -> Result<(), MsgPackError> {
        match self {
            Some(v) => v.encode(enc),
            None => {
                enc.write_nil();
                Ok(())
            }
        }
    }
}

/// Ordered name/value fields serialized as a MessagePack map body.
///
/// ```
/// use logpack::{Attachment, FieldValue};
///
/// let mut att = Attachment::new();
/// att.add("user", "alice")?;
/// att.add("retries", 3u8)?;
///
/// let mut seen = Vec::new();
/// att.visit(&mut |name: &str, value: FieldValue<'_>| seen.push(format!("{name}={value:?}")))?;
/// assert_eq!(seen, ["user=Str(\"alice\")", "retries=Int(3)"]);
/// # Ok::<(), logpack::AttachmentError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Attachment {
    enc: MsgPackEncoder<Writer>,
    count: usize,
}

impl PartialEq for Attachment {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.msgpack_body() == other.msgpack_body()
    }
}

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CodecConfig) -> Self {
        Self {
            enc: MsgPackEncoder::with_config(config),
            count: 0,
        }
    }

    /// Rebuilds an attachment from a map body received from elsewhere.
    ///
    /// The bytes are not checked here; [`visit`](Self::visit) reports any
    /// mismatch between `bytes` and `count`.
    pub fn from_msgpack_body(bytes: &[u8], count: usize) -> Self {
        let mut writer = Writer::with_capacity(bytes.len());
        writer.buf(bytes);
        Self {
            enc: MsgPackEncoder::from_sink(writer),
            count,
        }
    }

    /// Rebuilds an attachment from a standalone map document.
    pub fn from_msgpack_document(bytes: &[u8]) -> Result<Self, AttachmentError> {
        match decode_one(bytes) {
            DecodeStep::Consumed(n, Value::Map(count)) => {
                Ok(Self::from_msgpack_body(&bytes[n..], count as usize))
            }
            DecodeStep::Consumed(_, other) => Err(AttachmentError::NotAMap { kind: other.kind() }),
            DecodeStep::NeedMoreData => Err(AttachmentError::Truncated {
                consumed: 0,
                len: bytes.len(),
            }),
            DecodeStep::Invalid(err) => Err(AttachmentError::Decode(err)),
        }
    }

    /// Appends a field. On failure the attachment is left exactly as it was.
    pub fn add<V: AttachmentValue>(&mut self, name: &str, value: V) -> Result<(), AttachmentError> {
        let mark = self.enc.sink().len();
        let written = self
            .enc
            .write_str(name)
            .and_then(|()| value.encode(&mut self.enc));
        if let Err(err) = written {
            self.enc.sink_mut().truncate(mark);
            return Err(AttachmentError::Encode(err));
        }
        self.count += 1;
        Ok(())
    }

    /// Appends a field whose value is nil.
    pub fn add_null(&mut self, name: &str) -> Result<(), AttachmentError> {
        self.add(name, None::<bool>)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The map body: every name/value pair, no header.
    pub fn msgpack_body(&self) -> &[u8] {
        self.enc.sink().as_slice()
    }

    /// The body prefixed with a map header of matching count.
    pub fn to_msgpack_document(&self) -> Result<Vec<u8>, AttachmentError> {
        let count = u32::try_from(self.count)
            .map_err(|_| AttachmentError::Encode(MsgPackError::LengthOverflow(self.count)))?;
        let body = self.msgpack_body();
        let mut enc = MsgPackEncoder::from_sink(Vec::with_capacity(body.len() + 5));
        enc.write_map_header(count);
        let mut out = enc.into_inner();
        out.extend_from_slice(body);
        Ok(out)
    }

    /// Iterates the fields in insertion order.
    pub fn fields(&self) -> Fields<'_> {
        Fields {
            bytes: self.msgpack_body(),
            offset: 0,
            index: 0,
            count: self.count,
            done: false,
        }
    }

    /// Replays every field into `visitor`, in insertion order.
    ///
    /// Fields before a corrupt entry have already been delivered when an
    /// error is returned.
    pub fn visit<V: AttachmentVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), AttachmentError> {
        for field in self.fields() {
            let (name, value) = field?;
            visitor.visit_field(name, value);
        }
        Ok(())
    }
}

/// Iterator over the fields of an [`Attachment`].
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    bytes: &'a [u8],
    offset: usize,
    index: usize,
    count: usize,
    done: bool,
}

impl<'a> Fields<'a> {
    fn next_value(&mut self) -> Result<Value<'a>, AttachmentError> {
        match decode_one(&self.bytes[self.offset..]) {
            DecodeStep::Consumed(n, value) => {
                self.offset += n;
                Ok(value)
            }
            DecodeStep::NeedMoreData => Err(AttachmentError::Truncated {
                consumed: self.offset,
                len: self.bytes.len(),
            }),
            DecodeStep::Invalid(err) => Err(AttachmentError::Decode(err.shifted(self.offset))),
        }
    }

    fn next_field(&mut self) -> Result<(&'a str, FieldValue<'a>), AttachmentError> {
        let index = self.index;
        let name_offset = self.offset;
        let name = match self.next_value()? {
            Value::Str(bytes) => str::from_utf8(bytes).map_err(|_| AttachmentError::InvalidUtf8 { index })?,
            _ => {
                return Err(AttachmentError::NameNotString {
                    index,
                    offset: name_offset,
                })
            }
        };
        let value_offset = self.offset;
        let value = match self.next_value()? {
            Value::Nil => FieldValue::Nil,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Int(v) => FieldValue::Int(v),
            Value::UInt(v) => FieldValue::UInt(v),
            Value::LongLong(v) => FieldValue::LongLong(v),
            Value::ULongLong(v) => FieldValue::ULongLong(v),
            Value::Float(v) => FieldValue::Float(v),
            Value::Double(v) => FieldValue::Double(v),
            Value::Str(bytes) => {
                FieldValue::Str(str::from_utf8(bytes).map_err(|_| AttachmentError::InvalidUtf8 { index })?)
            }
            Value::Array(_) | Value::Map(_) => {
                return Err(AttachmentError::UnexpectedContainer {
                    index,
                    offset: value_offset,
                })
            }
        };
        self.index += 1;
        Ok((name, value))
    }

    /// Counts the whole values left after the expected fields.
    fn trailing_fields(&self) -> usize {
        let mut offset = self.offset;
        let mut values: usize = 0;
        while let DecodeStep::Consumed(n, _) = decode_one(&self.bytes[offset..]) {
            offset += n;
            values += 1;
        }
        values.div_ceil(2)
    }

    fn fail(&mut self, err: AttachmentError) -> Option<<Self as Iterator>::Item> {
        tracing::error!(error = %err, field = self.index, "corrupt attachment body");
        self.done = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = Result<(&'a str, FieldValue<'a>), AttachmentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.index == self.count {
            self.done = true;
            if self.offset < self.bytes.len() {
                let found = self.count + self.trailing_fields().max(1);
                let err = AttachmentError::CountMismatch {
                    expected: self.count,
                    found,
                };
                return self.fail(err);
            }
            return None;
        }
        match self.next_field() {
            Ok(field) => Some(Ok(field)),
            Err(err) => self.fail(err),
        }
    }
}

impl JsonDump for Attachment {
    /// Writes the fields as a JSON object.
    ///
    /// A corrupt entry fails the dump with [`JsonBuilderError::Attachment`]
    /// and poisons the builder, so a partial object is never extracted.
    fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        builder.object_begin()?;
        for field in self.fields() {
            let (name, value) = field.map_err(|err| builder.fail(JsonBuilderError::Attachment(err)))?;
            builder.write_name(name)?;
            match value {
                FieldValue::Int(v) => builder.write_integer(v as i64)?,
                FieldValue::UInt(v) => builder.write_unsigned(v as u64)?,
                FieldValue::LongLong(v) => builder.write_integer(v)?,
                FieldValue::ULongLong(v) => builder.write_unsigned(v)?,
                FieldValue::Float(v) => builder.write_double(v as f64)?,
                FieldValue::Double(v) => builder.write_double(v)?,
                FieldValue::Str(s) => builder.write_string(s)?,
                FieldValue::Bool(b) => builder.write_bool(b)?,
                FieldValue::Nil => builder.write_null()?,
            };
        }
        builder.object_end()?;
        Ok(())
    }
}
