//! Rendering whole values into a [`JsonBuilder`].

use super::builder::{JsonBuilder, JsonValue};
use super::error::JsonBuilderError;

/// Types that can write themselves, possibly as nested containers, into a
/// builder.
pub trait JsonDump {
    fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError>;
}

/// Writes `value` at the builder's current position.
pub fn dump<T: JsonDump + ?Sized>(builder: &mut JsonBuilder, value: &T) -> Result<(), JsonBuilderError> {
    value.dump_json(builder)
}

/// Renders `value` as a standalone JSON document.
///
/// ```
/// assert_eq!(logpack::json::to_json_string(&vec![1.0, 1.1]).unwrap(), "[1,1.1]");
/// ```
pub fn to_json_string<T: JsonDump + ?Sized>(value: &T) -> Result<String, JsonBuilderError> {
    let mut builder = JsonBuilder::new();
    value.dump_json(&mut builder)?;
    builder.extract_string()
}

macro_rules! dump_scalar {
    ($($ty:ty),*) => {$(
        impl JsonDump for $ty {
            fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
                self.write_json(builder)
            }
        }
    )*};
}

dump_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, str, String, ());

impl<T: JsonDump + ?Sized> JsonDump for &T {
    fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        (**self).dump_json(builder)
    }
}

impl<T: JsonDump> JsonDump for Option<T> {
    fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        match self {
            Some(v) => v.dump_json(builder),
            None => builder.write_null().map(|_| ()),
        }
    }
}

impl<T: JsonDump> JsonDump for [T] {
    fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        builder.array_begin()?;
        for item in self {
            item.dump_json(builder)?;
        }
        builder.array_end()?;
        Ok(())
    }
}

impl<T: JsonDump> JsonDump for Vec<T> {
    fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        self.as_slice().dump_json(builder)
    }
}

impl JsonDump for serde_json::Value {
    fn dump_json(&self, builder: &mut JsonBuilder) -> Result<(), JsonBuilderError> {
        use serde_json::Value;
        match self {
            Value::Null => {
                builder.write_null()?;
            }
            Value::Bool(b) => {
                builder.write_bool(*b)?;
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    builder.write_integer(i)?;
                } else if let Some(u) = n.as_u64() {
                    builder.write_unsigned(u)?;
                } else {
                    builder.write_double(n.as_f64().unwrap_or(f64::NAN))?;
                }
            }
            Value::String(s) => {
                builder.write_string(s)?;
            }
            Value::Array(items) => items.dump_json(builder)?,
            Value::Object(map) => {
                builder.object_begin()?;
                for (key, value) in map {
                    builder.write_name(key)?;
                    value.dump_json(builder)?;
                }
                builder.object_end()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn floats_drop_integral_fraction() {
        assert_eq!(to_json_string(&1.0f64).unwrap(), "1");
        assert_eq!(to_json_string(&1.1f64).unwrap(), "1.1");
    }

    #[test]
    fn nested_vectors() {
        let v: Vec<Vec<i32>> = vec![vec![], vec![1, 2]];
        assert_eq!(to_json_string(&v).unwrap(), "[[],[1,2]]");
    }

    #[test]
    fn options_render_null() {
        let v = vec![Some("a"), None];
        assert_eq!(to_json_string(&v).unwrap(), r#"["a",null]"#);
    }

    #[test]
    fn serde_json_value_round_trips() {
        let value = json!({"a": [{"b": 1}], "c": "x\ny", "d": null, "e": 2.5, "f": u64::MAX});
        let text = to_json_string(&value).unwrap();
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn dump_inside_open_container() {
        let mut b = JsonBuilder::new();
        b.object_begin().unwrap().write_name("list").unwrap();
        dump(&mut b, &[true, false][..]).unwrap();
        b.object_end().unwrap();
        assert_eq!(b.extract_string().unwrap(), r#"{"list":[true,false]}"#);
    }
}
