//! Tunables shared by the codecs and the dump tool.

use serde::Deserialize;

/// Codec configuration, usually loaded from a TOML file.
///
/// Every field has a default, so an empty document is a valid config.
///
/// ```
/// use logpack::CodecConfig;
///
/// let config = CodecConfig::from_toml_str("json_max_depth = 8").unwrap();
/// assert_eq!(config.json_max_depth, Some(8));
/// assert_eq!(config.writer_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Initial byte capacity of encoder writers and attachment buffers.
    pub writer_capacity: usize,
    /// Maximum number of open arrays/objects in a `JsonBuilder`.
    /// `None` disables the limit.
    pub json_max_depth: Option<usize>,
    /// Chunk size used when the dump tool reads its input.
    pub read_chunk_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            writer_capacity: 256,
            json_max_depth: Some(128),
            read_chunk_size: 8192,
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}
