// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::TranslationResult;
use crate::error::{Error, Result};

// Reasoning models (deepseek-r1, qwq, ...) prepend their chain of thought.
static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());

pub struct ResponseParser;

impl ResponseParser {
    /// Parse the translations out of a raw model reply.
    pub fn parse(raw: &str) -> Result<Vec<TranslationResult>> {
        if raw.trim().is_empty() {
            return Err(Error::EmptyResponse {
                provider: "model".into(),
            });
        }

        let json = Self::extract_json(raw)?;
        serde_json::from_str(&json).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    /// The span from the first `[` to the last `]`, after reasoning blocks
    /// are stripped.
    pub fn extract_json(raw: &str) -> Result<String> {
        let cleaned = THINK_BLOCK.replace_all(raw, "");
        let cleaned = cleaned.trim();

        match (cleaned.find('['), cleaned.rfind(']')) {
            (Some(start), Some(end)) if start < end => Ok(cleaned[start..=end].to_string()),
            _ => Err(Error::JsonNotFound),
        }
    }
}
