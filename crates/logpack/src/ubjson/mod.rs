//! UBJSON (Universal Binary JSON) output.

pub mod constants;
pub mod encoder;
pub mod error;

pub use encoder::{UbjsonEncoder, UbjsonValue};
pub use error::UbjsonError;
