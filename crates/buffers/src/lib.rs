//! Byte-level leaves shared by every logpack codec.
//!
//! - [`ByteSink`] accepts raw bytes and provides tag plus big-endian payload
//!   writers on top of `append`.
//! - [`Writer`] is the default growable sink, with a flush mark and rollback.
//! - [`Reader`] is a bounds-checked cursor over a borrowed slice.
//! - [`endian`] reads and writes integers in network byte order.

pub mod endian;
mod error;
mod reader;
mod sink;
mod writer;

pub use endian::BigEndian;
pub use error::BufferError;
pub use reader::Reader;
pub use sink::ByteSink;
pub use writer::Writer;
