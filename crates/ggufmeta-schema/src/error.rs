use thiserror::Error;

/// Errors returned when a metadata tree does not fit an architecture schema.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{0} not found")]
    MissingField(String),
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),
    #[error("invalid metadata at `{path}`: {reason}")]
    Validation { path: String, reason: String },
}

impl SchemaError {
    pub(crate) fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation { path: path.into(), reason: reason.into() }
    }

    /// Dotted path of the offending field, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField(path) | Self::Validation { path, .. } => Some(path),
            Self::UnsupportedArchitecture(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
