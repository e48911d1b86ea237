//! End-to-end tests: bytes on disk to a validated record.

use std::io::Cursor;

use ggufmeta::{
    Architecture, CHUNK_SIZE, ErrorKind, FileType, GgufValue, Number, ParseConfig, parse,
    parse_raw, parse_raw_with_config, parse_reader, parse_with_config,
};
use ggufmeta_test_support::{GgufBuilder, llama_v2};

fn partial() -> ParseConfig {
    ParseConfig { allow_partial_chunk: true, ..Default::default() }
}

#[test]
fn llama_file_decodes_to_llama_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = llama_v2().write(&dir, "llama.gguf", CHUNK_SIZE);

    let meta = parse(&path).unwrap();
    assert!(meta.is_llama());
    assert_eq!(meta.architecture(), Architecture::Llama);

    let llama = meta.as_llama().unwrap();
    assert_eq!(llama.general.name.as_deref(), Some("LLaMA v2"));
    assert_eq!(llama.llama.attention.head_count, Number::Unsigned(32));
    assert_eq!(llama.llama.context_length, Number::Unsigned(4096));
    assert_eq!(llama.llama.attention.layer_norm_rms_epsilon, Number::Float(9.999999974752427e-7));
    assert_eq!(llama.llama.attention.head_count_kv, None);
    assert_eq!(llama.llama.layer_count, None);
    assert_eq!(llama.llama.rope.freq_base, None);
}

#[test]
fn llama_record_has_no_placeholder_fields() {
    let data = llama_v2().build();
    let meta = parse_reader(Cursor::new(data), &partial()).unwrap();
    let json = serde_json::to_value(&meta).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "general": { "architecture": "llama", "name": "LLaMA v2" },
            "llama": {
                "attention": { "head_count": 32, "layer_norm_rms_epsilon": 9.999999974752427e-7 },
                "context_length": 4096,
                "embedding_length": 4096,
                "feed_forward_length": 11008,
                "rope": { "dimension_count": 128 }
            }
        })
    );
}

#[test]
fn raw_tree_keeps_every_key() {
    let data = llama_v2().string("tokenizer.ggml.model", "llama").build();
    let tree = ggufmeta::parse_raw_reader(Cursor::new(data), &partial()).unwrap();
    assert_eq!(
        tree.value("tokenizer.ggml.model"),
        Some(&GgufValue::String("llama".into()))
    );
    assert_eq!(tree.value("llama.attention.head_count"), Some(&GgufValue::U32(32)));
    assert_eq!(tree.leaves().len(), 9);
}

#[test]
fn parse_raw_reads_a_padded_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = GgufBuilder::new(3).u64("big", u64::MAX).write(&dir, "raw.gguf", CHUNK_SIZE);
    let tree = parse_raw(&path).unwrap();
    assert_eq!(tree.value("big"), Some(&GgufValue::U64(u64::MAX)));
}

#[test]
fn small_file_needs_partial_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.gguf");
    std::fs::write(&path, llama_v2().build()).unwrap();

    let err = parse(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedRead);

    let meta = parse_with_config(&path, &partial()).unwrap();
    assert!(meta.is_llama());
}

#[test]
fn custom_chunk_size_reads_across_boundaries() {
    // Every single read in this header, the longest key included, fits in one chunk.
    let dir = tempfile::tempdir().unwrap();
    let path = llama_v2().write(&dir, "chunked.gguf", 64);
    let cfg = ParseConfig { chunk_size: 64, allow_partial_chunk: false };
    let tree = parse_raw_with_config(&path, &cfg).unwrap();
    assert_eq!(tree.value("general.name"), Some(&GgufValue::String("LLaMA v2".into())));
}

#[test]
fn version_one_file_validates() {
    let data = GgufBuilder::new(1)
        .string("general.architecture", "gpt2")
        .u32("gpt2.attention.head_count", 12)
        .f32("gpt2.attention.layer_norm_epsilon", 1e-5)
        .u32("gpt2.context_length", 1024)
        .u32("gpt2.embedding_length", 768)
        .u32("gpt2.layer_count", 12)
        .u32("general.file_type", 1)
        .build();
    let meta = parse_reader(Cursor::new(data), &partial()).unwrap();
    assert!(meta.is_gpt2());
    assert_eq!(meta.general().file_type, Some(FileType::MostlyF16));
}

#[test]
fn falcon_with_bool_and_optional_layout() {
    let data = GgufBuilder::new(3)
        .string("general.architecture", "falcon")
        .u32("falcon.attention.head_count", 71)
        .u32("falcon.attention.head_count_kv", 1)
        .f32("falcon.attention.layer_norm_epsilon", 1e-5)
        .bool("falcon.attention.use_norm", true)
        .u32("falcon.context_length", 2048)
        .u32("falcon.embedding_length", 4544)
        .u32("falcon.layer_count", 32)
        .string("falcon.tensor_data_layout", "jploski")
        .build();
    let meta = parse_reader(Cursor::new(data), &partial()).unwrap();
    let falcon = meta.as_falcon().unwrap();
    assert!(falcon.falcon.attention.use_norm);
    assert_eq!(falcon.falcon.tensor_data_layout.as_deref(), Some("jploski"));
}

#[test]
fn general_source_block_is_carried() {
    let data = llama_v2()
        .string("general.source.url", "https://example.org/model")
        .string("general.source.huggingface.repository", "org/model")
        .string("general.license", "llama2")
        .build();
    let meta = parse_reader(Cursor::new(data), &partial()).unwrap();
    let general = meta.general();
    assert_eq!(general.license.as_deref(), Some("llama2"));
    let source = general.source.as_ref().unwrap();
    assert_eq!(source.url.as_deref(), Some("https://example.org/model"));
    assert_eq!(
        source.huggingface.as_ref().and_then(|h| h.repository.as_deref()),
        Some("org/model")
    );
}

#[test]
fn whisper_file_is_rejected_by_parse_but_decodes_raw() {
    let data = GgufBuilder::new(3).string("general.architecture", "whisper").build();
    let err = parse_reader(Cursor::new(data.clone()), &partial()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedArchitecture);
    assert!(ggufmeta::parse_raw_reader(Cursor::new(data), &partial()).is_ok());
}

#[test]
fn infinite_float_is_a_valid_number() {
    let data = llama_v2().f32("llama.rope.freq_base", f32::INFINITY).build();
    let meta = parse_reader(Cursor::new(data), &partial()).unwrap();
    let rope = &meta.as_llama().unwrap().llama.rope;
    assert_eq!(rope.freq_base, Some(Number::Float(f64::INFINITY)));

    let data = llama_v2().f32("llama.rope.freq_base", f32::NAN).build();
    let err = parse_reader(Cursor::new(data), &partial()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "invalid metadata at `llama.rope.freq_base`: expected number, found NaN"
    );
}
