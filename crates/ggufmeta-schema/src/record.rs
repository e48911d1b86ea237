//! Typed per-architecture metadata records.
//!
//! Records are built only by the validator. Serialized, each one has the
//! nested `general` / `<architecture>` shape with absent optional fields
//! omitted.

use serde::{Deserialize, Serialize};

use crate::architecture::Architecture;
use crate::error::{Result, SchemaError};
use crate::field::FieldValue;
use crate::file_type::FileType;
use crate::number::Number;

/// The `general` block every architecture shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralMetadata {
    pub architecture: Architecture,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantization_version: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub huggingface: Option<HuggingFaceSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuggingFaceSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

// ---------------------------------------------------------------------------
// Shared sub-blocks
// ---------------------------------------------------------------------------

/// Attention block of RMS-norm models (llama, gemma).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmsNormAttention {
    pub head_count: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_count_kv: Option<Number>,
    pub layer_norm_rms_epsilon: Number,
}

/// Attention block of layer-norm models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerNormAttention {
    pub head_count: Number,
    pub layer_norm_epsilon: Number,
}

/// Rotary embedding applied to part of each head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialRope {
    pub dimension_count: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Number>,
}

// ---------------------------------------------------------------------------
// llama
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlamaMetadata {
    pub general: GeneralMetadata,
    pub llama: LlamaParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlamaParams {
    pub attention: RmsNormAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub feed_forward_length: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_count: Option<Number>,
    pub rope: LlamaRope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tensor_data_layout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlamaRope {
    pub dimension_count: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq_base: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_linear: Option<Number>,
}

// ---------------------------------------------------------------------------
// mpt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MptMetadata {
    pub general: GeneralMetadata,
    pub mpt: MptParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MptParams {
    pub attention: MptAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub layer_count: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MptAttention {
    pub alibi_bias_max: Number,
    pub clip_kqv: Number,
    pub head_count: Number,
    pub layer_norm_epsilon: Number,
}

// ---------------------------------------------------------------------------
// gptneox / gptj / gpt2 / bloom
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptNeoXMetadata {
    pub general: GeneralMetadata,
    pub gptneox: GptNeoXParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptNeoXParams {
    pub attention: LayerNormAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub layer_count: Number,
    pub rope: PartialRope,
    pub use_parallel_residual: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptJMetadata {
    pub general: GeneralMetadata,
    pub gptj: GptJParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptJParams {
    pub attention: LayerNormAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub layer_count: Number,
    pub rope: PartialRope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gpt2Metadata {
    pub general: GeneralMetadata,
    pub gpt2: Gpt2Params,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gpt2Params {
    pub attention: LayerNormAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub layer_count: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomMetadata {
    pub general: GeneralMetadata,
    pub bloom: BloomParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomParams {
    pub attention: LayerNormAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub feed_forward_length: Number,
    pub layer_count: Number,
}

// ---------------------------------------------------------------------------
// falcon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FalconMetadata {
    pub general: GeneralMetadata,
    pub falcon: FalconParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FalconParams {
    pub attention: FalconAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub layer_count: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tensor_data_layout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FalconAttention {
    pub head_count: Number,
    pub head_count_kv: Number,
    pub layer_norm_epsilon: Number,
    pub use_norm: bool,
}

// ---------------------------------------------------------------------------
// gemma / rwkv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemmaMetadata {
    pub general: GeneralMetadata,
    pub gemma: GemmaParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemmaParams {
    pub attention: RmsNormAttention,
    pub block_count: Number,
    pub context_length: Number,
    pub embedding_length: Number,
    pub feed_forward_length: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RwkvMetadata {
    pub general: GeneralMetadata,
    pub rwkv: RwkvParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RwkvParams {
    pub architecture_version: Number,
    pub context_length: Number,
    pub embedding_length: Number,
    pub feed_forward_length: Number,
    pub layer_count: Number,
}

// ---------------------------------------------------------------------------
// whisper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperMetadata {
    pub general: GeneralMetadata,
    pub whisper: WhisperParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperParams {
    pub decoder: WhisperDecoder,
    pub encoder: WhisperEncoder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperAttention {
    pub head_count: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperDecoder {
    pub attention: WhisperAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub layer_count: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperEncoder {
    pub attention: WhisperAttention,
    pub context_length: Number,
    pub embedding_length: Number,
    pub layer_count: Number,
    pub mels_count: Number,
}

// ---------------------------------------------------------------------------
// GgufMetadata
// ---------------------------------------------------------------------------

/// Validated metadata, one variant per architecture schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GgufMetadata {
    Llama(LlamaMetadata),
    Mpt(MptMetadata),
    GptNeoX(GptNeoXMetadata),
    GptJ(GptJMetadata),
    Gpt2(Gpt2Metadata),
    Bloom(BloomMetadata),
    Falcon(FalconMetadata),
    Gemma(GemmaMetadata),
    Rwkv(RwkvMetadata),
    Whisper(WhisperMetadata),
}

macro_rules! metadata_variants {
    ($($variant:ident($record:ty) => $is:ident, $as:ident;)*) => {
        impl GgufMetadata {
            $(
                #[doc = concat!("`true` when this is a [`", stringify!($record), "`].")]
                pub fn $is(&self) -> bool {
                    matches!(self, Self::$variant(_))
                }

                #[doc = concat!("Narrow to [`", stringify!($record), "`].")]
                pub fn $as(&self) -> Option<&$record> {
                    match self {
                        Self::$variant(record) => Some(record),
                        _ => None,
                    }
                }
            )*

            /// Schema this record was validated against.
            pub fn architecture(&self) -> Architecture {
                match self {
                    $(Self::$variant(_) => Architecture::$variant,)*
                }
            }

            pub fn general(&self) -> &GeneralMetadata {
                match self {
                    $(Self::$variant(record) => &record.general,)*
                }
            }

            /// Build the record from a value already pruned by the validator.
            pub(crate) fn from_validated(
                architecture: Architecture,
                value: FieldValue,
            ) -> Result<Self> {
                let record = match architecture {
                    $(Architecture::$variant => <$record>::deserialize(value).map(Self::$variant),)*
                };
                record.map_err(|e| SchemaError::validation(architecture.name(), e.to_string()))
            }
        }
    };
}

metadata_variants! {
    Llama(LlamaMetadata) => is_llama, as_llama;
    Mpt(MptMetadata) => is_mpt, as_mpt;
    GptNeoX(GptNeoXMetadata) => is_gptneox, as_gptneox;
    GptJ(GptJMetadata) => is_gptj, as_gptj;
    Gpt2(Gpt2Metadata) => is_gpt2, as_gpt2;
    Bloom(BloomMetadata) => is_bloom, as_bloom;
    Falcon(FalconMetadata) => is_falcon, as_falcon;
    Gemma(GemmaMetadata) => is_gemma, as_gemma;
    Rwkv(RwkvMetadata) => is_rwkv, as_rwkv;
    Whisper(WhisperMetadata) => is_whisper, as_whisper;
}
