use thiserror::Error;

/// Error returned by bounds-checked [`Reader`](crate::Reader) operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("end of buffer")]
    EndOfBuffer,
}
