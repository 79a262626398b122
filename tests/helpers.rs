// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use prism_translate::domain::{ProviderConfig, ProviderKind, TranslationResult};

/// Provider entry with a test key, optionally pointed at a mock server.
#[allow(dead_code)]
pub fn make_provider(name: &str, kind: ProviderKind, models: &[&str]) -> ProviderConfig {
    ProviderConfig {
        name: name.to_string(),
        kind,
        api_key: kind.requires_api_key().then(|| "test-key".to_string()),
        base_url: None,
        account_id: None,
        models: models.iter().map(|m| m.to_string()).collect(),
    }
}

#[allow(dead_code)]
pub fn with_base_url(mut provider: ProviderConfig, base_url: &str) -> ProviderConfig {
    provider.base_url = Some(base_url.to_string());
    provider
}

#[allow(dead_code)]
pub fn make_result(language: &str, code: &str, text: &str) -> TranslationResult {
    TranslationResult {
        language: language.to_string(),
        code: code.to_string(),
        text: text.to_string(),
        tone: "Neutral".to_string(),
        confidence: 90.0,
    }
}

/// A model reply carrying the given `(language, code, text)` triples.
#[allow(dead_code)]
pub fn reply_json(entries: &[(&str, &str, &str)]) -> String {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|(language, code, text)| {
            serde_json::json!({
                "language": language,
                "code": code,
                "text": text,
                "tone": "Neutral",
                "confidence": 92
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
