//! Schema data for the `general` block and every architecture.

use crate::architecture::Architecture;
use crate::descriptor::{ArchitectureSchema, FieldKind, FieldSpec};

use FieldKind::{Bool, Number, Object, String as Text};

const fn req(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec::required(name, kind)
}

const fn opt(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec::optional(name, kind)
}

// ---------------------------------------------------------------------------
// general.*
// ---------------------------------------------------------------------------

const HUGGINGFACE_SOURCE: &[FieldSpec] = &[opt("repository", Text)];

const SOURCE: &[FieldSpec] = &[opt("huggingface", Object(HUGGINGFACE_SOURCE)), opt("url", Text)];

/// Fields of the `general` block shared by every architecture.
pub const GENERAL_FIELDS: &[FieldSpec] = &[
    req("architecture", Text),
    opt("alignment", Number),
    opt("author", Text),
    opt("description", Text),
    opt("file_type", FieldKind::FileType),
    opt("license", Text),
    opt("name", Text),
    opt("quantization_version", Number),
    opt("source", Object(SOURCE)),
    opt("url", Text),
];

// ---------------------------------------------------------------------------
// Shared sub-blocks
// ---------------------------------------------------------------------------

const LAYER_NORM_ATTENTION: &[FieldSpec] =
    &[req("head_count", Number), req("layer_norm_epsilon", Number)];

const RMS_NORM_ATTENTION: &[FieldSpec] = &[
    req("head_count", Number),
    opt("head_count_kv", Number),
    req("layer_norm_rms_epsilon", Number),
];

const PARTIAL_ROPE: &[FieldSpec] = &[req("dimension_count", Number), opt("scale", Number)];

// ---------------------------------------------------------------------------
// Architectures
// ---------------------------------------------------------------------------

const LLAMA_ROPE: &[FieldSpec] = &[
    req("dimension_count", Number),
    opt("freq_base", Number),
    opt("scale", Number),
    opt("scale_linear", Number),
];

const LLAMA: &[FieldSpec] = &[
    req("attention", Object(RMS_NORM_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("feed_forward_length", Number),
    opt("layer_count", Number),
    req("rope", Object(LLAMA_ROPE)),
    opt("tensor_data_layout", Text),
];

const MPT_ATTENTION: &[FieldSpec] = &[
    req("alibi_bias_max", Number),
    req("clip_kqv", Number),
    req("head_count", Number),
    req("layer_norm_epsilon", Number),
];

const MPT: &[FieldSpec] = &[
    req("attention", Object(MPT_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("layer_count", Number),
];

const GPTNEOX: &[FieldSpec] = &[
    req("attention", Object(LAYER_NORM_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("layer_count", Number),
    req("rope", Object(PARTIAL_ROPE)),
    req("use_parallel_residual", Bool),
];

const GPTJ: &[FieldSpec] = &[
    req("attention", Object(LAYER_NORM_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("layer_count", Number),
    req("rope", Object(PARTIAL_ROPE)),
];

const GPT2: &[FieldSpec] = &[
    req("attention", Object(LAYER_NORM_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("layer_count", Number),
];

const BLOOM: &[FieldSpec] = &[
    req("attention", Object(LAYER_NORM_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("feed_forward_length", Number),
    req("layer_count", Number),
];

const FALCON_ATTENTION: &[FieldSpec] = &[
    req("head_count", Number),
    req("head_count_kv", Number),
    req("layer_norm_epsilon", Number),
    req("use_norm", Bool),
];

const FALCON: &[FieldSpec] = &[
    req("attention", Object(FALCON_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("layer_count", Number),
    opt("tensor_data_layout", Text),
];

const GEMMA: &[FieldSpec] = &[
    req("attention", Object(RMS_NORM_ATTENTION)),
    req("block_count", Number),
    req("context_length", Number),
    req("embedding_length", Number),
    req("feed_forward_length", Number),
];

const RWKV: &[FieldSpec] = &[
    req("architecture_version", Number),
    req("context_length", Number),
    req("embedding_length", Number),
    req("feed_forward_length", Number),
    req("layer_count", Number),
];

const WHISPER_ATTENTION: &[FieldSpec] = &[req("head_count", Number)];

const WHISPER_DECODER: &[FieldSpec] = &[
    req("attention", Object(WHISPER_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("layer_count", Number),
];

const WHISPER_ENCODER: &[FieldSpec] = &[
    req("attention", Object(WHISPER_ATTENTION)),
    req("context_length", Number),
    req("embedding_length", Number),
    req("layer_count", Number),
    req("mels_count", Number),
];

const WHISPER: &[FieldSpec] =
    &[req("decoder", Object(WHISPER_DECODER)), req("encoder", Object(WHISPER_ENCODER))];

/// Schema of the parameter block for `architecture`.
pub const fn schema_for(architecture: Architecture) -> ArchitectureSchema {
    let fields = match architecture {
        Architecture::Llama => LLAMA,
        Architecture::Mpt => MPT,
        Architecture::GptNeoX => GPTNEOX,
        Architecture::GptJ => GPTJ,
        Architecture::Gpt2 => GPT2,
        Architecture::Bloom => BLOOM,
        Architecture::Falcon => FALCON,
        Architecture::Gemma => GEMMA,
        Architecture::Rwkv => RWKV,
        Architecture::Whisper => WHISPER,
    };
    ArchitectureSchema { architecture, fields }
}
