#![no_main]

use std::io::Cursor;

use arbitrary::Arbitrary;
use ggufmeta_reader::{GgufError, GgufValueType, ReaderOptions, read_document};
use libfuzzer_sys::fuzz_target;

/// One key-value entry inside a synthetic GGUF stream.
#[derive(Arbitrary, Debug)]
struct KvInput {
    version: u8,
    /// Key bytes; may not be valid UTF-8.
    key: Vec<u8>,
    value_type: u32,
    value_bytes: Vec<u8>,
    trailing: Vec<u8>,
}

fuzz_target!(|input: KvInput| {
    if input.key.len() > 512 || input.value_bytes.len() > 4096 || input.trailing.len() > 256 {
        return;
    }
    let version = u32::from(input.version % 4);
    let buf = build_stream(version, &input);

    let opts = ReaderOptions { chunk_size: 256, allow_partial_chunk: true };
    match read_document(Cursor::new(&buf), opts) {
        Ok(doc) => {
            assert!(version >= 1);
            assert!(GgufValueType::from_u32(input.value_type).is_some());
            assert!(doc.metadata.leaves().len() <= 1);
        }
        Err(GgufError::UnsupportedVersion(v)) => assert_eq!(v, 0),
        Err(GgufError::UnknownType { tag, .. }) => {
            assert!(GgufValueType::from_u32(tag).is_none() || tag == 9);
        }
        Err(_) => {}
    }
});

fn build_stream(version: u32, input: &KvInput) -> Vec<u8> {
    let size = |n: usize| -> Vec<u8> {
        if version == 1 { (n as u32).to_le_bytes().to_vec() } else { (n as u64).to_le_bytes().to_vec() }
    };

    let mut buf = b"GGUF".to_vec();
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend(size(0));
    buf.extend(size(1));
    buf.extend(size(input.key.len()));
    buf.extend_from_slice(&input.key);
    buf.extend_from_slice(&input.value_type.to_le_bytes());
    buf.extend_from_slice(&input.value_bytes);
    buf.extend_from_slice(&input.trailing);
    buf
}
