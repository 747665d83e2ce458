//! MessagePack subset: nil, bool, integers, floats, strings, array and map
//! headers. No bin, ext, or timestamp types.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod stream;
pub mod to_json;
pub mod value;
pub mod visitor;

pub use decoder::{decode_one, unpack, DecodeStep, Stop, Unpacked};
pub use encoder::MsgPackEncoder;
pub use error::MsgPackError;
pub use stream::MsgPackStream;
pub use to_json::{msgpack_to_json, MsgPackToJson, ToJsonError};
pub use value::Value;
pub use visitor::MsgPackVisitor;
