use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MsgPackError {
    #[error("unsupported msgpack tag 0x{tag:02x} at offset {offset}")]
    UnsupportedTag { tag: u8, offset: usize },
    #[error("length {0} does not fit in a msgpack length field")]
    LengthOverflow(usize),
}

impl MsgPackError {
    /// Moves a tag offset forward by `base`, turning a position relative to a
    /// sub-slice into one relative to the enclosing buffer.
    pub(crate) fn shifted(self, base: usize) -> Self {
        match self {
            MsgPackError::UnsupportedTag { tag, offset } => MsgPackError::UnsupportedTag {
                tag,
                offset: offset + base,
            },
            other => other,
        }
    }
}
