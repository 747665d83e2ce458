//! Streaming JSON text output.

pub mod builder;
pub mod dump;
pub mod error;
pub mod escape;

pub use builder::{format_double, BuilderState, JsonBuilder, JsonValue};
pub use dump::{dump, to_json_string, JsonDump};
pub use error::JsonBuilderError;
pub use escape::{escape, escape_into};
