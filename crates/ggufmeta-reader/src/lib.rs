//! Decoder for the metadata header of GGUF model files.
//!
//! Reads the magic, version, and counts, then every key-value entry, and
//! assembles the entries into a [`MetadataTree`] keyed by dotted path. The
//! tensor index and tensor data that follow the metadata are never touched.
//!
//! The source is consumed through a [`ByteCursor`] that fetches fixed-size
//! chunks (10 MiB by default) and never seeks.
//!
//! # Example
//!
//! ```no_run
//! use ggufmeta_reader::{ReaderOptions, read_document_from_path};
//!
//! let doc = read_document_from_path("model.gguf", ReaderOptions::default())?;
//! println!("GGUF v{}", doc.header.version.as_u32());
//! for (key, value) in doc.metadata.leaves() {
//!     println!("{key} = {value:?}");
//! }
//! # Ok::<(), ggufmeta_reader::GgufError>(())
//! ```

pub mod cursor;
pub mod decode;
pub mod document;
pub mod error;
pub mod tree;
pub mod value;

pub use cursor::{ByteCursor, CHUNK_SIZE, ReaderOptions};
pub use document::{
    GGUF_MAGIC, GgufDocument, GgufHeader, read_document, read_document_from_path, read_header,
};
pub use error::{GgufError, Result, TagContext};
pub use tree::{MAX_KEY_DEPTH, MetadataNode, MetadataTree};
pub use value::{GgufValue, GgufValueType, GgufVersion};

/// Minimum supported GGUF version.
pub const GGUF_VERSION_MIN: u32 = 1;
/// Maximum supported GGUF version (inclusive).
pub const GGUF_VERSION_MAX: u32 = 3;

/// Returns `true` if `data` starts with the GGUF magic bytes.
#[inline]
pub fn check_magic(data: &[u8]) -> bool {
    data.get(0..4) == Some(&GGUF_MAGIC[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_magic_valid() {
        assert!(check_magic(b"GGUFextra"));
    }

    #[test]
    fn check_magic_invalid() {
        assert!(!check_magic(b"GGML"));
        assert!(!check_magic(b""));
        assert!(!check_magic(b"GGU"));
    }

    #[test]
    fn version_bounds_match_enum() {
        assert!(GgufVersion::from_u32(GGUF_VERSION_MIN).is_some());
        assert!(GgufVersion::from_u32(GGUF_VERSION_MAX).is_some());
        assert!(GgufVersion::from_u32(GGUF_VERSION_MIN - 1).is_none());
        assert!(GgufVersion::from_u32(GGUF_VERSION_MAX + 1).is_none());
    }

    proptest::proptest! {
        #[test]
        fn check_magic_is_true_only_for_gguf_prefix(data in proptest::collection::vec(0u8..=255, 4..32)) {
            let is_gguf = data.starts_with(b"GGUF");
            proptest::prop_assert_eq!(check_magic(&data), is_gguf);
        }
    }
}
