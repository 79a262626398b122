// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use super::Language;

/// Global default model plus per-language overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    default_model: String,
    // keyed by lowercased canonical language name
    overrides: BTreeMap<String, (String, String)>,
}

impl ModelSelection {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            default_model: default_model.into(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn key(language: &str) -> String {
        Language::canonical_name(language).to_lowercase()
    }

    /// Model that will translate into `language`.
    pub fn effective(&self, language: &str) -> &str {
        self.overrides
            .get(&Self::key(language))
            .map(|(_, model)| model.as_str())
            .unwrap_or(&self.default_model)
    }

    /// `None` resets the language to the global default.
    pub fn set_override(&mut self, language: &str, model: Option<String>) {
        let key = Self::key(language);
        match model {
            Some(model) => {
                self.overrides
                    .insert(key, (Language::canonical_name(language), model));
            }
            None => {
                self.overrides.remove(&key);
            }
        }
    }

    pub fn has_override(&self, language: &str) -> bool {
        self.overrides.contains_key(&Self::key(language))
    }

    /// `(language, model)` pairs in language order.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .values()
            .map(|(lang, model)| (lang.as_str(), model.as_str()))
    }
}
