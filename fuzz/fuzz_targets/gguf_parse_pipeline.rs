#![no_main]

use std::io::Cursor;

use ggufmeta::{ErrorKind, ParseConfig, parse_raw_reader, parse_reader, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let cfg = ParseConfig { chunk_size: 128, allow_partial_chunk: true };

    let raw = parse_raw_reader(Cursor::new(data), &cfg);
    let full = parse_reader(Cursor::new(data), &cfg);

    match (&raw, &full) {
        // Validation is a pure function of the decoded tree.
        (Ok(tree), _) => {
            assert_eq!(validate(tree).ok(), full.as_ref().ok().cloned());
        }
        // Decode failures are reported identically by both entry points.
        (Err(raw_err), Err(full_err)) => assert_eq!(raw_err.kind(), full_err.kind()),
        (Err(_), Ok(_)) => panic!("validated a document that failed to decode"),
    }

    match full {
        Ok(meta) => assert!(meta.architecture().is_dispatchable()),
        Err(e) if e.kind() == ErrorKind::Config => panic!("default-valid config rejected: {e}"),
        Err(_) => {}
    }
});
