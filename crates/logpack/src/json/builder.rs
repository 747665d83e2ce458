//! Streaming JSON text builder.
//!
//! The builder is a push-down automaton with one frame per open container.
//! Each call is checked against the top frame before any text is emitted, so
//! the output is syntactically valid JSON whenever `extract_string` succeeds.

use super::error::JsonBuilderError;
use super::escape::escape_into;
use crate::config::CodecConfig;

/// What the top frame accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Top-level: a single value of any kind.
    ExpectValue,
    ExpectFirstPropertyName,
    ExpectMorePropertyName,
    ExpectPropertyValue,
    ExpectFirstArrayValue,
    ExpectMoreArrayValue,
}

/// Builds one JSON document incrementally.
///
/// ```
/// use logpack::JsonBuilder;
///
/// let mut b = JsonBuilder::new();
/// b.object_begin()?
///     .write_name("a")?
///     .write_integer(1)?
///     .write_name("b")?
///     .write_bool(true)?
///     .object_end()?;
/// assert_eq!(b.extract_string()?, r#"{"a":1,"b":true}"#);
/// # Ok::<(), logpack::JsonBuilderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonBuilder {
    out: String,
    stack: Vec<BuilderState>,
    max_depth: Option<usize>,
    poisoned: bool,
}

impl Default for JsonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonBuilder {
    /// Builder with no nesting limit.
    pub fn new() -> Self {
        Self {
            out: String::new(),
            stack: vec![BuilderState::ExpectValue],
            max_depth: None,
            poisoned: false,
        }
    }

    pub fn with_config(config: &CodecConfig) -> Self {
        let mut builder = Self::new();
        builder.out.reserve(config.writer_capacity);
        builder.max_depth = config.json_max_depth;
        builder
    }

    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Number of open arrays and objects.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    /// State of the innermost frame, `None` once the document is complete.
    pub fn state(&self) -> Option<BuilderState> {
        self.stack.last().copied()
    }

    /// True when a complete document is ready to extract.
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty() && !self.poisoned
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Text emitted so far, complete or not.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Discards all output and errors, ready for a new document.
    pub fn reset(&mut self) {
        self.out.clear();
        self.stack.clear();
        self.stack.push(BuilderState::ExpectValue);
        self.poisoned = false;
    }

    /// Takes the finished document and resets the builder.
    pub fn extract_string(&mut self) -> Result<String, JsonBuilderError> {
        if self.poisoned {
            return Err(JsonBuilderError::Poisoned);
        }
        if !self.stack.is_empty() {
            let err = JsonBuilderError::NotEnded {
                depth: self.depth(),
            };
            return Err(self.refuse(err));
        }
        let text = std::mem::take(&mut self.out);
        self.reset();
        Ok(text)
    }

    pub fn object_begin(&mut self) -> Result<&mut Self, JsonBuilderError> {
        self.begin("object_begin", '{', BuilderState::ExpectFirstPropertyName)
    }

    pub fn object_end(&mut self) -> Result<&mut Self, JsonBuilderError> {
        self.end("object_end", '}', BuilderState::ExpectFirstPropertyName, BuilderState::ExpectMorePropertyName)
    }

    pub fn array_begin(&mut self) -> Result<&mut Self, JsonBuilderError> {
        self.begin("array_begin", '[', BuilderState::ExpectFirstArrayValue)
    }

    pub fn array_end(&mut self) -> Result<&mut Self, JsonBuilderError> {
        self.end("array_end", ']', BuilderState::ExpectFirstArrayValue, BuilderState::ExpectMoreArrayValue)
    }

    pub fn write_name(&mut self, name: &str) -> Result<&mut Self, JsonBuilderError> {
        self.check_usable()?;
        let comma = match self.stack.last().copied() {
            Some(BuilderState::ExpectFirstPropertyName) => false,
            Some(BuilderState::ExpectMorePropertyName) => true,
            Some(state) => {
                let err = JsonBuilderError::InvalidState {
                    op: "write_name",
                    state,
                };
                return Err(self.refuse(err));
            }
            None => return Err(self.refuse(JsonBuilderError::Closed)),
        };
        if comma {
            self.out.push(',');
        }
        self.push_quoted(name);
        self.out.push(':');
        self.set_top(BuilderState::ExpectPropertyValue);
        Ok(self)
    }

    pub fn write_integer(&mut self, val: i64) -> Result<&mut Self, JsonBuilderError> {
        self.write_literal("write_integer", &val.to_string())
    }

    pub fn write_unsigned(&mut self, val: u64) -> Result<&mut Self, JsonBuilderError> {
        self.write_literal("write_unsigned", &val.to_string())
    }

    /// Writes a double. NaN becomes `null` and infinities become `±1e308`.
    pub fn write_double(&mut self, val: f64) -> Result<&mut Self, JsonBuilderError> {
        self.write_literal("write_double", &format_double(val))
    }

    pub fn write_bool(&mut self, val: bool) -> Result<&mut Self, JsonBuilderError> {
        self.write_literal("write_bool", if val { "true" } else { "false" })
    }

    pub fn write_null(&mut self) -> Result<&mut Self, JsonBuilderError> {
        self.write_literal("write_null", "null")
    }

    pub fn write_string(&mut self, val: &str) -> Result<&mut Self, JsonBuilderError> {
        let comma = self.check_value("write_string")?;
        if comma {
            self.out.push(',');
        }
        self.push_quoted(val);
        self.end_value();
        Ok(self)
    }

    /// Writes any scalar that knows its JSON form.
    pub fn write_value<T: JsonValue + ?Sized>(&mut self, val: &T) -> Result<&mut Self, JsonBuilderError> {
        val.write_json(self)?;
        Ok(self)
    }

    fn write_literal(&mut self, op: &'static str, text: &str) -> Result<&mut Self, JsonBuilderError> {
        let comma = self.check_value(op)?;
        if comma {
            self.out.push(',');
        }
        self.out.push_str(text);
        self.end_value();
        Ok(self)
    }

    fn begin(&mut self, op: &'static str, open: char, state: BuilderState) -> Result<&mut Self, JsonBuilderError> {
        let comma = self.check_value(op)?;
        if let Some(limit) = self.max_depth {
            if self.depth() >= limit {
                return Err(self.refuse(JsonBuilderError::DepthExceeded { limit }));
            }
        }
        if comma {
            self.out.push(',');
        }
        self.out.push(open);
        self.stack.push(state);
        Ok(self)
    }

    fn end(
        &mut self,
        op: &'static str,
        close: char,
        first: BuilderState,
        more: BuilderState,
    ) -> Result<&mut Self, JsonBuilderError> {
        self.check_usable()?;
        match self.stack.last().copied() {
            Some(state) if state == first || state == more => {}
            Some(state) => return Err(self.refuse(JsonBuilderError::InvalidState { op, state })),
            None => return Err(self.refuse(JsonBuilderError::Closed)),
        }
        self.out.push(close);
        self.stack.pop();
        self.end_value();
        Ok(self)
    }

    /// Checks that a value may be written now. Returns whether a separating
    /// comma must precede it.
    fn check_value(&mut self, op: &'static str) -> Result<bool, JsonBuilderError> {
        self.check_usable()?;
        match self.stack.last().copied() {
            Some(BuilderState::ExpectValue)
            | Some(BuilderState::ExpectPropertyValue)
            | Some(BuilderState::ExpectFirstArrayValue) => Ok(false),
            Some(BuilderState::ExpectMoreArrayValue) => Ok(true),
            Some(state) => Err(self.refuse(JsonBuilderError::InvalidState { op, state })),
            None => Err(self.refuse(JsonBuilderError::Closed)),
        }
    }

    fn check_usable(&self) -> Result<(), JsonBuilderError> {
        if self.poisoned {
            Err(JsonBuilderError::Poisoned)
        } else {
            Ok(())
        }
    }

    fn refuse(&mut self, err: JsonBuilderError) -> JsonBuilderError {
        tracing::debug!(error = %err, depth = self.depth(), "json builder refused transition");
        self.poisoned = true;
        err
    }

    /// Poisons the builder on behalf of a value that failed mid-dump.
    pub(crate) fn fail(&mut self, err: JsonBuilderError) -> JsonBuilderError {
        self.refuse(err)
    }

    /// Advances the enclosing frame after a complete value.
    fn end_value(&mut self) {
        match self.stack.last().copied() {
            Some(BuilderState::ExpectValue) => {
                self.stack.pop();
            }
            Some(BuilderState::ExpectPropertyValue) => self.set_top(BuilderState::ExpectMorePropertyName),
            Some(BuilderState::ExpectFirstArrayValue) => self.set_top(BuilderState::ExpectMoreArrayValue),
            _ => {}
        }
    }

    fn set_top(&mut self, state: BuilderState) {
        if let Some(top) = self.stack.last_mut() {
            *top = state;
        }
    }

    fn push_quoted(&mut self, s: &str) {
        self.out.push('"');
        escape_into(&mut self.out, s);
        self.out.push('"');
    }
}

/// JSON text of a double.
///
/// Integral values below 1e15 print without a fraction. Magnitudes from 1e15
/// up and nonzero ones below 1e-6 use exponent form. Everything is the
/// shortest text that round-trips.
pub fn format_double(f: f64) -> String {
    if f.is_nan() {
        "null".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "1e308".to_string()
        } else {
            "-1e308".to_string()
        }
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else if f.abs() >= 1e15 || f.abs() < 1e-6 {
        format!("{:e}", f)
    } else {
        format!("{}", f)
    }
}

/// Scalars that write themselves as a single JSON literal.
pub trait JsonValue {
    fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError>;
}

macro_rules! json_value_via {
    ($method:ident as $wide:ty => $($ty:ty),*) => {$(
        impl JsonValue for $ty {
            fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
                builder.$method(*self as $wide).map(|_| ())
            }
        }
    )*};
}

json_value_via!(write_integer as i64 => i8, i16, i32, i64, isize);
json_value_via!(write_unsigned as u64 => u8, u16, u32, u64, usize);
json_value_via!(write_double as f64 => f32, f64);

impl JsonValue for bool {
    fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        builder.write_bool(*self).map(|_| ())
    }
}

impl JsonValue for str {
    fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        builder.write_string(self).map(|_| ())
    }
}

impl JsonValue for String {
    fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        builder.write_string(self).map(|_| ())
    }
}

impl JsonValue for () {
    fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        builder.write_null().map(|_| ())
    }
}

impl<T: JsonValue + ?Sized> JsonValue for &T {
    fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        (**self).write_json(builder)
    }
}

impl<T: JsonValue> JsonValue for Option<T> {
    fn write_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        match self {
            Some(v) => v.write_json(builder),
            None => builder.write_null().map(|_| ()),
        }
    }
}
