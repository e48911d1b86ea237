use std::fmt;
use std::io;
use thiserror::Error;

/// Where a type tag was encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContext {
    /// Top-level value type of a key-value entry.
    Value,
    /// Element type of an array value.
    ArrayElement,
}

impl fmt::Display for TagContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "metadata value"),
            Self::ArrayElement => write!(f, "array element"),
        }
    }
}

/// Errors returned while decoding a GGUF metadata header.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GgufError {
    #[error("truncated read at offset {offset}: needed {requested} bytes, {available} available")]
    TruncatedRead { offset: u64, requested: u64, available: u64 },
    #[error("invalid gguf magic number: {0:02x?}")]
    InvalidMagic([u8; 4]),
    #[error("unsupported gguf version: {0}")]
    UnsupportedVersion(u32),
    #[error("unknown {context} type: {tag}")]
    UnknownType { tag: u32, context: TagContext },
    #[error("metadata key `{key}` conflicts with existing entry at `{at}`")]
    KeyConflict { key: String, at: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GgufError>;
