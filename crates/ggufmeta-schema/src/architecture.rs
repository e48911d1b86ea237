//! Closed set of model architectures with a metadata schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Model family named by `general.architecture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Llama,
    Mpt,
    GptNeoX,
    GptJ,
    Gpt2,
    Bloom,
    Falcon,
    Gemma,
    Rwkv,
    /// Encoder/decoder schema; only reachable through an explicit schema choice.
    Whisper,
}

impl Architecture {
    /// Architectures selected automatically from `general.architecture`.
    pub const DISPATCHABLE: [Self; 9] = [
        Self::Llama,
        Self::Mpt,
        Self::GptNeoX,
        Self::GptJ,
        Self::Gpt2,
        Self::Bloom,
        Self::Falcon,
        Self::Gemma,
        Self::Rwkv,
    ];

    /// Every architecture that has a schema.
    pub const ALL: [Self; 10] = [
        Self::Llama,
        Self::Mpt,
        Self::GptNeoX,
        Self::GptJ,
        Self::Gpt2,
        Self::Bloom,
        Self::Falcon,
        Self::Gemma,
        Self::Rwkv,
        Self::Whisper,
    ];

    /// The name used in `general.architecture` and as the parameter block key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Llama => "llama",
            Self::Mpt => "mpt",
            Self::GptNeoX => "gptneox",
            Self::GptJ => "gptj",
            Self::Gpt2 => "gpt2",
            Self::Bloom => "bloom",
            Self::Falcon => "falcon",
            Self::Gemma => "gemma",
            Self::Rwkv => "rwkv",
            Self::Whisper => "whisper",
        }
    }

    /// Exact, case-sensitive lookup over every schema.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|arch| arch.name() == name)
    }

    pub fn is_dispatchable(self) -> bool {
        Self::DISPATCHABLE.contains(&self)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Architecture {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SchemaError::UnsupportedArchitecture(s.to_string()))
    }
}
