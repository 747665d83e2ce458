use super::visitor::MsgPackVisitor;

/// One decoded MessagePack item.
///
/// Containers are reported as headers only; a `Value` is never a tree.
/// The integer variant is picked by the wire tag, not by magnitude: a 64-bit
/// tag always yields `LongLong`/`ULongLong`, even for small values, and
/// positive fixints yield `Int`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    Int(i32),
    UInt(u32),
    LongLong(i64),
    ULongLong(u64),
    Float(f32),
    Double(f64),
    /// Raw string bytes borrowed from the input.
    Str(&'a [u8]),
    Array(u32),
    Map(u32),
}

impl<'a> Value<'a> {
    /// Dispatches exactly one visitor callback for this value.
    pub fn accept<V: MsgPackVisitor + ?Sized>(&self, visitor: &mut V) {
        match *self {
            Value::Nil => visitor.on_nil(),
            Value::Bool(b) => visitor.on_boolean(b),
            Value::Int(v) => visitor.on_int(v),
            Value::UInt(v) => visitor.on_uint(v),
            Value::LongLong(v) => visitor.on_longlong(v),
            Value::ULongLong(v) => visitor.on_ulonglong(v),
            Value::Float(v) => visitor.on_float(v),
            Value::Double(v) => visitor.on_double(v),
            Value::Str(bytes) => visitor.on_string(bytes),
            Value::Array(n) => visitor.on_array(n),
            Value::Map(n) => visitor.on_map(n),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_))
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) | Value::LongLong(_) | Value::ULongLong(_) => "integer",
            Value::Float(_) | Value::Double(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}
