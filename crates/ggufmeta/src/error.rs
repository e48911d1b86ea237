use std::fmt;
use std::io;

use ggufmeta_reader::GgufError;
use ggufmeta_schema::SchemaError;
use thiserror::Error;

use crate::config::ConfigError;

/// Any failure from [`parse`](crate::parse) and friends.
///
/// The underlying error is kept as-is; use [`Error::kind`] to branch without
/// matching on nested enums or message text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] GgufError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    TruncatedRead,
    InvalidMagic,
    UnsupportedVersion,
    UnknownType,
    MissingField,
    UnsupportedArchitecture,
    /// Schema mismatch, or a dotted key colliding with an existing entry.
    Validation,
    Io,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(e) => match e {
                GgufError::TruncatedRead { .. } => ErrorKind::TruncatedRead,
                GgufError::InvalidMagic(_) => ErrorKind::InvalidMagic,
                GgufError::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
                GgufError::UnknownType { .. } => ErrorKind::UnknownType,
                GgufError::KeyConflict { .. } => ErrorKind::Validation,
                _ => ErrorKind::Io,
            },
            Self::Schema(e) => match e {
                SchemaError::MissingField(_) => ErrorKind::MissingField,
                SchemaError::UnsupportedArchitecture(_) => ErrorKind::UnsupportedArchitecture,
                _ => ErrorKind::Validation,
            },
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// `true` when the input is not a GGUF file at all.
    ///
    /// Inputs shorter than the first chunk read report
    /// [`ErrorKind::TruncatedRead`] instead unless partial chunks are allowed.
    pub fn is_format_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidMagic | ErrorKind::UnsupportedVersion)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Decode(GgufError::Io(e))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TruncatedRead => "truncated read",
            Self::InvalidMagic => "invalid magic",
            Self::UnsupportedVersion => "unsupported version",
            Self::UnknownType => "unknown type",
            Self::MissingField => "missing field",
            Self::UnsupportedArchitecture => "unsupported architecture",
            Self::Validation => "validation",
            Self::Io => "io",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
