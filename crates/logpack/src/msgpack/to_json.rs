//! MessagePack to JSON text rendering.

use thiserror::Error;

use super::decoder::{unpack, Stop};
use super::error::MsgPackError;
use super::value::Value;
use super::visitor::MsgPackVisitor;
use crate::config::CodecConfig;
use crate::json::{format_double, JsonBuilder, JsonBuilderError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToJsonError {
    /// JSON object names must be scalars.
    #[error("{kind} cannot be used as a JSON object key")]
    UnsupportedKey { kind: &'static str },
    #[error(transparent)]
    Json(#[from] JsonBuilderError),
    #[error(transparent)]
    Decode(#[from] MsgPackError),
    /// Input ended inside a value or container.
    #[error("input ends inside a value ({pending} trailing byte(s), {open} open container(s))")]
    Incomplete { pending: usize, open: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Array,
    Map,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    /// Items still expected. Maps count keys and values separately.
    remaining: u64,
}

/// Visitor that renders decoded values as JSON documents, one per top-level
/// MessagePack value.
///
/// The first failure is latched: later callbacks are ignored and the error is
/// reported by [`error`](MsgPackToJson::error) and
/// [`finish`](MsgPackToJson::finish). Documents completed before the failure
/// stay available through [`take_documents`](MsgPackToJson::take_documents).
#[derive(Debug, Clone, Default)]
pub struct MsgPackToJson {
    builder: JsonBuilder,
    frames: Vec<Frame>,
    docs: Vec<String>,
    error: Option<ToJsonError>,
}

impl MsgPackToJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CodecConfig) -> Self {
        Self {
            builder: JsonBuilder::with_config(config),
            ..Self::default()
        }
    }

    /// Number of containers still open in the current document.
    pub fn open_containers(&self) -> usize {
        self.frames.len()
    }

    /// Returns the documents completed so far, even after a failure.
    pub fn take_documents(&mut self) -> Vec<String> {
        std::mem::take(&mut self.docs)
    }

    /// The latched conversion error, if any.
    pub fn error(&self) -> Option<&ToJsonError> {
        self.error.as_ref()
    }

    /// Returns the remaining documents, failing if conversion failed or a
    /// document is unfinished.
    pub fn finish(mut self) -> Result<Vec<String>, ToJsonError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if !self.frames.is_empty() {
            return Err(ToJsonError::Incomplete {
                pending: 0,
                open: self.frames.len(),
            });
        }
        Ok(self.take_documents())
    }

    fn handle(&mut self, value: Value<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.step(value) {
            tracing::debug!(error = %err, "msgpack to json conversion failed");
            self.error = Some(err);
        }
    }

    fn step(&mut self, value: Value<'_>) -> Result<(), ToJsonError> {
        let expects_key = matches!(
            self.frames.last(),
            Some(Frame { kind: FrameKind::Map, remaining }) if remaining % 2 == 0
        );
        if expects_key {
            let name = match value {
                Value::Str(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                Value::Array(_) | Value::Map(_) => {
                    return Err(ToJsonError::UnsupportedKey { kind: value.kind() })
                }
                scalar => scalar_text(&scalar),
            };
            self.builder.write_name(&name)?;
            if let Some(frame) = self.frames.last_mut() {
                frame.remaining -= 1;
            }
            return Ok(());
        }
        match value {
            Value::Array(0) => {
                self.builder.array_begin()?.array_end()?;
            }
            Value::Map(0) => {
                self.builder.object_begin()?.object_end()?;
            }
            Value::Array(n) => {
                self.builder.array_begin()?;
                self.frames.push(Frame {
                    kind: FrameKind::Array,
                    remaining: n as u64,
                });
                return Ok(());
            }
            Value::Map(n) => {
                self.builder.object_begin()?;
                self.frames.push(Frame {
                    kind: FrameKind::Map,
                    remaining: n as u64 * 2,
                });
                return Ok(());
            }
            Value::Nil => {
                self.builder.write_null()?;
            }
            Value::Bool(b) => {
                self.builder.write_bool(b)?;
            }
            Value::Int(v) => {
                self.builder.write_integer(v as i64)?;
            }
            Value::LongLong(v) => {
                self.builder.write_integer(v)?;
            }
            Value::UInt(v) => {
                self.builder.write_unsigned(v as u64)?;
            }
            Value::ULongLong(v) => {
                self.builder.write_unsigned(v)?;
            }
            Value::Float(v) => {
                self.builder.write_double(v as f64)?;
            }
            Value::Double(v) => {
                self.builder.write_double(v)?;
            }
            Value::Str(bytes) => {
                self.builder.write_string(&String::from_utf8_lossy(bytes))?;
            }
        }
        self.complete_value()
    }

    /// Bookkeeping after a whole value: closes every container it fills and
    /// extracts the document once the outermost one is done.
    fn complete_value(&mut self) -> Result<(), ToJsonError> {
        loop {
            let Some(frame) = self.frames.last_mut() else {
                let doc = self.builder.extract_string()?;
                self.docs.push(doc);
                return Ok(());
            };
            frame.remaining -= 1;
            if frame.remaining > 0 {
                return Ok(());
            }
            let kind = frame.kind;
            self.frames.pop();
            match kind {
                FrameKind::Array => self.builder.array_end()?,
                FrameKind::Map => self.builder.object_end()?,
            };
        }
    }
}

/// Text used when a non-string scalar appears as a map key.
fn scalar_text(value: &Value<'_>) -> String {
    match *value {
        Value::Nil => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::LongLong(v) => v.to_string(),
        Value::ULongLong(v) => v.to_string(),
        Value::Float(v) => format_double(v as f64),
        Value::Double(v) => format_double(v),
        Value::Str(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::Array(_) | Value::Map(_) => String::new(),
    }
}

impl MsgPackVisitor for MsgPackToJson {
    fn on_int(&mut self, val: i32) {
        self.handle(Value::Int(val));
    }
    fn on_uint(&mut self, val: u32) {
        self.handle(Value::UInt(val));
    }
    fn on_longlong(&mut self, val: i64) {
        self.handle(Value::LongLong(val));
    }
    fn on_ulonglong(&mut self, val: u64) {
        self.handle(Value::ULongLong(val));
    }
    fn on_float(&mut self, val: f32) {
        self.handle(Value::Float(val));
    }
    fn on_double(&mut self, val: f64) {
        self.handle(Value::Double(val));
    }
    fn on_string(&mut self, bytes: &[u8]) {
        self.handle(Value::Str(bytes));
    }
    fn on_nil(&mut self) {
        self.handle(Value::Nil);
    }
    fn on_boolean(&mut self, val: bool) {
        self.handle(Value::Bool(val));
    }
    fn on_array(&mut self, len: u32) {
        self.handle(Value::Array(len));
    }
    fn on_map(&mut self, len: u32) {
        self.handle(Value::Map(len));
    }
}

/// Renders a complete MessagePack buffer as JSON, one document per top-level
/// value.
///
/// ```
/// let docs = logpack::msgpack_to_json(&[0x81, 0xa1, b'a', 0x01, 0xc3]).unwrap();
/// assert_eq!(docs, [r#"{"a":1}"#, "true"]);
/// ```
pub fn msgpack_to_json(bytes: &[u8]) -> Result<Vec<String>, ToJsonError> {
    let mut conv = MsgPackToJson::new();
    let out = unpack(bytes, &mut conv);
    match out.stop {
        Stop::Exhausted => {}
        Stop::NeedMoreData => {
            return Err(ToJsonError::Incomplete {
                pending: bytes.len() - out.consumed,
                open: conv.open_containers(),
            })
        }
        Stop::Invalid(err) => return Err(err.into()),
    }
    conv.finish()
}
