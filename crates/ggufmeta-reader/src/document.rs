//! Header and key-value loop.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cursor::{ByteCursor, ReaderOptions};
use crate::decode::{read_size, read_string, read_u32, read_value};
use crate::error::{GgufError, Result};
use crate::tree::MetadataTree;
use crate::value::GgufVersion;

/// The four-byte magic that every GGUF file starts with.
pub const GGUF_MAGIC: [u8; 4] = *b"GGUF";

/// Fixed fields at the start of a GGUF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GgufHeader {
    pub version: GgufVersion,
    /// Number of tensors described after the metadata. Not parsed here.
    pub tensor_count: u64,
    /// Number of metadata key-value entries.
    pub kv_count: u64,
}

/// Everything decoded from a metadata header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GgufDocument {
    pub header: GgufHeader,
    pub metadata: MetadataTree,
}

/// Read magic, version, and the two counts.
pub fn read_header<R: Read>(cursor: &mut ByteCursor<R>) -> Result<GgufHeader> {
    let magic = cursor.read_array::<4>()?;
    if magic != GGUF_MAGIC {
        return Err(GgufError::InvalidMagic(magic));
    }

    let raw_version = read_u32(cursor)?;
    let version =
        GgufVersion::from_u32(raw_version).ok_or(GgufError::UnsupportedVersion(raw_version))?;

    let tensor_count = read_size(cursor, version)?;
    let kv_count = read_size(cursor, version)?;

    debug!(version = raw_version, tensor_count, kv_count, "read gguf header");
    Ok(GgufHeader { version, tensor_count, kv_count })
}

/// Decode the header and every metadata entry from `source`.
///
/// The first failure aborts the whole read; no partial tree is returned.
/// Reading stops right after the last key-value entry.
pub fn read_document<R: Read>(source: R, options: ReaderOptions) -> Result<GgufDocument> {
    let mut cursor = ByteCursor::with_options(source, options);
    let header = read_header(&mut cursor)?;

    let mut metadata = MetadataTree::new();
    for index in 0..header.kv_count {
        let key = read_string(&mut cursor, header.version)?;
        let tag = read_u32(&mut cursor)?;
        let value = read_value(&mut cursor, header.version, tag)?;
        trace!(index, key = %key, tag, "decoded metadata entry");
        metadata.insert(&key, value)?;
    }

    debug!(entries = header.kv_count, consumed = cursor.offset(), "decoded gguf metadata");
    Ok(GgufDocument { header, metadata })
}

/// Open `path` and decode its metadata header.
///
/// The file handle is released on return, whether decoding succeeded or not.
pub fn read_document_from_path(
    path: impl AsRef<Path>,
    options: ReaderOptions,
) -> Result<GgufDocument> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening gguf file");
    let file = File::open(path)?;
    read_document(file, options)
}
