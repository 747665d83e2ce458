use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UbjsonError {
    /// Unsigned values above `i64::MAX` need the high-precision type, which
    /// is not supported.
    #[error("unsigned value {0} does not fit in a UBJSON int64")]
    UnsupportedBigNumber(u64),
}
