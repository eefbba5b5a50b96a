//! Gemini safety settings.
//!
//! A deployment picks one block threshold; it is applied to every harm
//! category the service cares about.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Harm categories covered by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategoryHateSpeech,
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryDangerousContent,
    ];
}

/// Probability level at which Gemini blocks a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl HarmBlockThreshold {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarmBlockThreshold::BlockNone => "BLOCK_NONE",
            HarmBlockThreshold::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            HarmBlockThreshold::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            HarmBlockThreshold::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
        }
    }
}

impl fmt::Display for HarmBlockThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the preset names `strict` / `relaxed` as well as the raw API names.
impl FromStr for HarmBlockThreshold {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "STRICT" | "BLOCK_LOW_AND_ABOVE" => Ok(HarmBlockThreshold::BlockLowAndAbove),
            "RELAXED" | "BLOCK_ONLY_HIGH" => Ok(HarmBlockThreshold::BlockOnlyHigh),
            "BLOCK_MEDIUM_AND_ABOVE" => Ok(HarmBlockThreshold::BlockMediumAndAbove),
            "BLOCK_NONE" => Ok(HarmBlockThreshold::BlockNone),
            _ => Err(Error::Config(format!(
                "Unknown safety threshold '{}'. Expected strict, relaxed, or a Gemini threshold name",
                s
            ))),
        }
    }
}

/// One entry of the `safetySettings` request array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyPolicy {
    threshold: HarmBlockThreshold,
}

impl SafetyPolicy {
    pub fn new(threshold: HarmBlockThreshold) -> Self {
        Self { threshold }
    }

    /// Blocks anything rated low probability or above.
    pub fn strict() -> Self {
        Self::new(HarmBlockThreshold::BlockLowAndAbove)
    }

    /// Blocks only high-probability harm, for fewer refusals on benign photos.
    pub fn relaxed() -> Self {
        Self::new(HarmBlockThreshold::BlockOnlyHigh)
    }

    pub fn threshold(&self) -> HarmBlockThreshold {
        self.threshold
    }

    pub fn settings(&self) -> Vec<SafetySetting> {
        HarmCategory::ALL
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: self.threshold,
            })
            .collect()
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::strict()
    }
}
