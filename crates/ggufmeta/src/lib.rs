//! Read the metadata header of a GGUF model file and validate it against the
//! schema of the model's architecture.
//!
//! ```no_run
//! let meta = ggufmeta::parse("llama-2-7b.Q4_0.gguf")?;
//! if let Some(llama) = meta.as_llama() {
//!     println!("context length: {}", llama.llama.context_length);
//! }
//! # Ok::<(), ggufmeta::Error>(())
//! ```
//!
//! [`parse_raw`] stops after decoding and returns the untyped
//! [`MetadataTree`] for callers that want every key, not just the ones a
//! schema names. Tensor descriptors and tensor data are never read.
//!
//! Files are read in fixed chunks of [`CHUNK_SIZE`] bytes by default. A file
//! whose metadata ends inside a chunk that cannot be filled fails with
//! [`ErrorKind::TruncatedRead`] unless
//! [`ParseConfig::allow_partial_chunk`] is set.

pub mod config;
pub mod error;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info_span};

pub use config::{ConfigError, ParseConfig};
pub use error::{Error, ErrorKind, Result};
pub use ggufmeta_reader::{
    CHUNK_SIZE, GgufDocument, GgufError, GgufHeader, GgufValue, GgufValueType, GgufVersion,
    MetadataNode, MetadataTree, ReaderOptions,
};
pub use ggufmeta_schema::{
    Architecture, FileType, GeneralMetadata, GgufMetadata, Number, SchemaError, validate,
    validate_as,
};

/// Record types for each architecture.
pub mod records {
    pub use ggufmeta_schema::record::*;
}

/// Decode the metadata of the file at `path` without schema validation.
///
/// The default config fills a whole [`CHUNK_SIZE`] chunk before the magic is
/// checked, so any file shorter than one chunk fails with
/// [`ErrorKind::TruncatedRead`], GGUF or not. Set
/// [`ParseConfig::allow_partial_chunk`] when [`Error::is_format_error`] must
/// classify small inputs.
pub fn parse_raw(path: impl AsRef<Path>) -> Result<MetadataTree> {
    parse_raw_with_config(path, &ParseConfig::default())
}

/// Decode and validate the metadata of the file at `path`.
///
/// Small files behave as described on [`parse_raw`].
pub fn parse(path: impl AsRef<Path>) -> Result<GgufMetadata> {
    parse_with_config(path, &ParseConfig::default())
}

pub fn parse_raw_with_config(path: impl AsRef<Path>, config: &ParseConfig) -> Result<MetadataTree> {
    let path = path.as_ref();
    let _span = info_span!("parse_raw", path = %path.display()).entered();
    Ok(read_path(path, config)?.metadata)
}

pub fn parse_with_config(path: impl AsRef<Path>, config: &ParseConfig) -> Result<GgufMetadata> {
    let path = path.as_ref();
    let _span = info_span!("parse", path = %path.display()).entered();
    let document = read_path(path, config)?;
    Ok(validate(&document.metadata)?)
}

/// Like [`parse_raw_with_config`] for any byte source.
pub fn parse_raw_reader<R: Read>(source: R, config: &ParseConfig) -> Result<MetadataTree> {
    let _span = info_span!("parse_raw").entered();
    Ok(read_source(source, config)?.metadata)
}

/// Like [`parse_with_config`] for any byte source.
pub fn parse_reader<R: Read>(source: R, config: &ParseConfig) -> Result<GgufMetadata> {
    let _span = info_span!("parse").entered();
    let document = read_source(source, config)?;
    Ok(validate(&document.metadata)?)
}

fn read_path(path: &Path, config: &ParseConfig) -> Result<GgufDocument> {
    config.validate()?;
    debug!(chunk_size = config.chunk_size, "opening gguf file");
    let file = File::open(path)?;
    Ok(ggufmeta_reader::read_document(file, config.reader_options())?)
}

fn read_source<R: Read>(source: R, config: &ParseConfig) -> Result<GgufDocument> {
    config.validate()?;
    Ok(ggufmeta_reader::read_document(source, config.reader_options())?)
}

#[cfg(feature = "rt-tokio")]
mod rt {
    use std::io;
    use std::path::PathBuf;

    use super::*;

    async fn run_blocking<T, F>(f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(f).await.map_err(|e| Error::from(io::Error::other(e)))?
    }

    /// [`parse_raw_with_config`](super::parse_raw_with_config) on tokio's
    /// blocking pool.
    pub async fn parse_raw_async(path: impl Into<PathBuf>, config: ParseConfig) -> Result<MetadataTree> {
        let path = path.into();
        run_blocking(move || parse_raw_with_config(path, &config)).await
    }

    /// [`parse_with_config`](super::parse_with_config) on tokio's blocking
    /// pool.
    pub async fn parse_async(path: impl Into<PathBuf>, config: ParseConfig) -> Result<GgufMetadata> {
        let path = path.into();
        run_blocking(move || parse_with_config(path, &config)).await
    }
}

#[cfg(feature = "rt-tokio")]
pub use rt::{parse_async, parse_raw_async};
