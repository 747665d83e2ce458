//! Serialization core for structured log records.
//!
//! - [`msgpack`]: minimal-width MessagePack encoder, resumable decoder, and a
//!   MessagePack to JSON renderer.
//! - [`attachment`]: append-only name/value container stored as a MessagePack
//!   map body.
//! - [`ubjson`]: UBJSON encoder with the same shape as the MessagePack one.
//! - [`json`]: streaming JSON text builder driven by an explicit state machine.

pub mod attachment;
pub mod cli;
pub mod config;
pub mod hex;
pub mod json;
pub mod msgpack;
pub mod ubjson;

pub use attachment::{Attachment, AttachmentError, AttachmentValue, AttachmentVisitor, FieldValue};
pub use config::CodecConfig;
pub use hex::hexify;
pub use json::{dump, JsonBuilder, JsonBuilderError, JsonDump};
pub use msgpack::{
    decode_one, msgpack_to_json, unpack, DecodeStep, MsgPackEncoder, MsgPackError,
    MsgPackStream, MsgPackToJson, MsgPackVisitor, Stop, Unpacked, Value,
};
pub use ubjson::{UbjsonEncoder, UbjsonError, UbjsonValue};
