//! `general.file_type` lookup table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Predominant tensor encoding of a model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(non_camel_case_types)]
pub enum FileType {
    AllF32,
    MostlyF16,
    MostlyQ4_0,
    MostlyQ4_1,
    MostlyQ4_1SomeF16,
    MostlyQ4_2,
    MostlyQ4_3,
    MostlyQ8_0,
    MostlyQ5_0,
    MostlyQ5_1,
    MostlyQ2K,
    MostlyQ3KS,
    MostlyQ3KM,
    MostlyQ3KL,
    MostlyQ4KS,
    MostlyQ4KM,
    MostlyQ5KS,
    MostlyQ5KM,
    MostlyQ6K,
    MostlyIq2Xxs,
    MostlyIq2Xs,
    MostlyQ2KS,
    MostlyQ3KXs,
    MostlyIq3Xxs,
}

impl FileType {
    /// Table order; the index is the integer stored in the file.
    const TABLE: [Self; 24] = [
        Self::AllF32,
        Self::MostlyF16,
        Self::MostlyQ4_0,
        Self::MostlyQ4_1,
        Self::MostlyQ4_1SomeF16,
        Self::MostlyQ4_2,
        Self::MostlyQ4_3,
        Self::MostlyQ8_0,
        Self::MostlyQ5_0,
        Self::MostlyQ5_1,
        Self::MostlyQ2K,
        Self::MostlyQ3KS,
        Self::MostlyQ3KM,
        Self::MostlyQ3KL,
        Self::MostlyQ4KS,
        Self::MostlyQ4KM,
        Self::MostlyQ5KS,
        Self::MostlyQ5KM,
        Self::MostlyQ6K,
        Self::MostlyIq2Xxs,
        Self::MostlyIq2Xs,
        Self::MostlyQ2KS,
        Self::MostlyQ3KXs,
        Self::MostlyIq3Xxs,
    ];

    /// Map the stored integer; codes newer than this table give `None`.
    pub fn from_code(code: u64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::TABLE.get(i).copied())
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllF32 => "ALL_F32",
            Self::MostlyF16 => "MOSTLY_F16",
            Self::MostlyQ4_0 => "MOSTLY_Q4_0",
            Self::MostlyQ4_1 => "MOSTLY_Q4_1",
            Self::MostlyQ4_1SomeF16 => "MOSTLY_Q4_1_SOME_F16",
            Self::MostlyQ4_2 => "MOSTLY_Q4_2",
            Self::MostlyQ4_3 => "MOSTLY_Q4_3",
            Self::MostlyQ8_0 => "MOSTLY_Q8_0",
            Self::MostlyQ5_0 => "MOSTLY_Q5_0",
            Self::MostlyQ5_1 => "MOSTLY_Q5_1",
            Self::MostlyQ2K => "MOSTLY_Q2_K",
            Self::MostlyQ3KS => "MOSTLY_Q3_K_S",
            Self::MostlyQ3KM => "MOSTLY_Q3_K_M",
            Self::MostlyQ3KL => "MOSTLY_Q3_K_L",
            Self::MostlyQ4KS => "MOSTLY_Q4_K_S",
            Self::MostlyQ4KM => "MOSTLY_Q4_K_M",
            Self::MostlyQ5KS => "MOSTLY_Q5_K_S",
            Self::MostlyQ5KM => "MOSTLY_Q5_K_M",
            Self::MostlyQ6K => "MOSTLY_Q6_K",
            Self::MostlyIq2Xxs => "MOSTLY_IQ2_XXS",
            Self::MostlyIq2Xs => "MOSTLY_IQ2_XS",
            Self::MostlyQ2KS => "MOSTLY_Q2_K_S",
            Self::MostlyQ3KXs => "MOSTLY_Q3_K_XS",
            Self::MostlyIq3Xxs => "MOSTLY_IQ3_XXS",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
