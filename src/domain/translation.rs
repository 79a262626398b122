// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Deserializer, Serialize};

use super::ProviderConfig;

/// One translation as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub language: String,
    pub code: String,
    pub text: String,
    #[serde(default)]
    pub tone: String,
    /// 0–100
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub confidence: f32,
}

/// Input to a single provider call.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub target_languages: Vec<String>,
    pub provider: ProviderConfig,
    /// Empty means the provider's default model.
    pub model_id: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfidence {
    Number(f64),
    Text(String),
}

// Models do not always send a plain in-range number.
fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<RawConfidence>::deserialize(deserializer)? {
        None => return Ok(0.0),
        Some(RawConfidence::Number(n)) => n,
        Some(RawConfidence::Text(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid confidence '{s}'")))?,
    };

    if !value.is_finite() {
        return Err(serde::de::Error::custom("confidence must be a finite number"));
    }

    Ok(value.clamp(0.0, 100.0) as f32)
}
