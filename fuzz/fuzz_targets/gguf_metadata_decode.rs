#![no_main]

use std::io::Cursor;

use ggufmeta_reader::{ReaderOptions, check_magic, read_document};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Small chunks so every read path crosses chunk boundaries.
    for chunk_size in [16, 64, 4096] {
        let opts = ReaderOptions { chunk_size, allow_partial_chunk: true };
        if let Ok(doc) = read_document(Cursor::new(data), opts) {
            assert!(check_magic(data));
            assert!(doc.metadata.leaves().len() as u64 <= doc.header.kv_count);
        }
    }

    // Strict mode must never accept more than lenient mode.
    let strict = ReaderOptions { chunk_size: 64, allow_partial_chunk: false };
    let lenient = ReaderOptions { chunk_size: 64, allow_partial_chunk: true };
    if read_document(Cursor::new(data), strict).is_ok() {
        assert!(read_document(Cursor::new(data), lenient).is_ok());
    }
});
