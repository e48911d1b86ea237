//! Snapshot tests for record JSON and schema error messages.

use ggufmeta_reader::{GgufValue, MetadataTree};
use ggufmeta_schema::{Architecture, FileType, schema_for, validate};

fn llama_tree() -> MetadataTree {
    let mut t = MetadataTree::new();
    for (key, value) in [
        ("general.architecture", GgufValue::String("llama".into())),
        ("general.name", GgufValue::String("LLaMA v2".into())),
        ("general.file_type", GgufValue::U32(2)),
        ("llama.attention.head_count", GgufValue::U32(32)),
        ("llama.attention.layer_norm_rms_epsilon", GgufValue::F32(1e-6)),
        ("llama.context_length", GgufValue::U32(4096)),
        ("llama.embedding_length", GgufValue::U32(4096)),
        ("llama.feed_forward_length", GgufValue::U32(11008)),
        ("llama.rope.dimension_count", GgufValue::U32(128)),
        ("tokenizer.ggml.model", GgufValue::String("llama".into())),
    ] {
        t.insert(key, value).unwrap();
    }
    t
}

#[test]
fn llama_record_json() {
    let meta = validate(&llama_tree()).unwrap();
    let json = serde_json::to_string_pretty(&meta).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "general": {
        "architecture": "llama",
        "file_type": "MOSTLY_Q4_0",
        "name": "LLaMA v2"
      },
      "llama": {
        "attention": {
          "head_count": 32,
          "layer_norm_rms_epsilon": 9.999999974752427e-7
        },
        "context_length": 4096,
        "embedding_length": 4096,
        "feed_forward_length": 11008,
        "rope": {
          "dimension_count": 128
        }
      }
    }
    "#);
}

#[test]
fn wrong_type_error_message() {
    let mut t = llama_tree();
    t.insert("llama.context_length", GgufValue::String("4k".into())).unwrap();
    insta::assert_snapshot!(
        validate(&t).unwrap_err().to_string(),
        @"invalid metadata at `llama.context_length`: expected number, found string"
    );
}

#[test]
fn missing_architecture_error_message() {
    insta::assert_snapshot!(
        validate(&MetadataTree::new()).unwrap_err().to_string(),
        @"general.architecture not found"
    );
}

#[test]
fn gptneox_required_paths() {
    let paths = schema_for(Architecture::GptNeoX).required_paths().join("\n");
    insta::assert_snapshot!(paths, @r"
    gptneox.attention.head_count
    gptneox.attention.layer_norm_epsilon
    gptneox.context_length
    gptneox.embedding_length
    gptneox.layer_count
    gptneox.rope.dimension_count
    gptneox.use_parallel_residual
    ");
}

#[test]
fn file_type_names() {
    let names: Vec<_> = (0..24).filter_map(FileType::from_code).map(FileType::as_str).collect();
    insta::assert_snapshot!(names.join(" "), @"ALL_F32 MOSTLY_F16 MOSTLY_Q4_0 MOSTLY_Q4_1 MOSTLY_Q4_1_SOME_F16 MOSTLY_Q4_2 MOSTLY_Q4_3 MOSTLY_Q8_0 MOSTLY_Q5_0 MOSTLY_Q5_1 MOSTLY_Q2_K MOSTLY_Q3_K_S MOSTLY_Q3_K_M MOSTLY_Q3_K_L MOSTLY_Q4_K_S MOSTLY_Q4_K_M MOSTLY_Q5_K_S MOSTLY_Q5_K_M MOSTLY_Q6_K MOSTLY_IQ2_XXS MOSTLY_IQ2_XS MOSTLY_Q2_K_S MOSTLY_Q3_K_XS MOSTLY_IQ3_XXS");
}
