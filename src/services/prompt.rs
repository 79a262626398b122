// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub const SYSTEM_PROMPT: &str = r#"You are a professional translator.
For each language, provide:
1. The translated text.
2. The tone (e.g., Formal, Casual, Neutral).
3. A confidence score between 0 and 100.
4. The standard ISO language code.

Return the response strictly as a JSON array with this schema:
[
  {
    "language": "Target Language Name",
    "code": "ISO Code",
    "text": "Translated Text",
    "tone": "Tone",
    "confidence": 95
  }
]"#;

pub fn user_prompt<S: AsRef<str>>(text: &str, languages: &[S]) -> String {
    let languages: Vec<&str> = languages.iter().map(AsRef::as_ref).collect();
    format!(
        "Translate this text: \"{}\" into these languages: {}.",
        text,
        languages.join(", ")
    )
}
