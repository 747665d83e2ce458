use thiserror::Error;

use super::builder::BuilderState;
use crate::attachment::AttachmentError;

/// Grammar violations reported by [`JsonBuilder`](super::JsonBuilder).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum JsonBuilderError {
    /// The document is complete; extract it or reset before writing more.
    #[error("json document is already complete")]
    Closed,
    #[error("`{op}` is not allowed while in state {state:?}")]
    InvalidState {
        op: &'static str,
        state: BuilderState,
    },
    #[error("json document still has {depth} open container(s)")]
    NotEnded { depth: usize },
    #[error("json nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },
    /// A value being dumped could not be read back.
    #[error("attachment: {0}")]
    Attachment(AttachmentError),
    /// A previous call failed; the builder must be reset.
    #[error("json builder is unusable after an earlier error")]
    Poisoned,
}
