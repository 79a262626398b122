// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub native_name: &'static str,
    pub code: &'static str,
}

const fn lang(name: &'static str, native_name: &'static str, code: &'static str) -> Language {
    Language {
        name,
        native_name,
        code,
    }
}

pub const LANGUAGES: &[Language] = &[
    lang("English", "English", "en"),
    lang("Chinese", "简体中文", "zh"),
    lang("Traditional Chinese", "繁體中文", "zh-TW"),
    lang("Japanese", "日本語", "ja"),
    lang("Korean", "한국어", "ko"),
    lang("Spanish", "Español", "es"),
    lang("French", "Français", "fr"),
    lang("German", "Deutsch", "de"),
    lang("Italian", "Italiano", "it"),
    lang("Portuguese", "Português", "pt"),
    lang("Russian", "Русский", "ru"),
    lang("Arabic", "العربية", "ar"),
    lang("Hindi", "हिन्दी", "hi"),
    lang("Turkish", "Türkçe", "tr"),
    lang("Vietnamese", "Tiếng Việt", "vi"),
    lang("Thai", "ไทย", "th"),
    lang("Indonesian", "Bahasa Indonesia", "id"),
    lang("Dutch", "Nederlands", "nl"),
    lang("Polish", "Polski", "pl"),
    lang("Ukrainian", "Українська", "uk"),
    lang("Swedish", "Svenska", "sv"),
    lang("Greek", "Ελληνικά", "el"),
    lang("Hebrew", "עברית", "he"),
    lang("Burmese", "မြန်မာ", "my"),
];

impl Language {
    /// Find a language by English name, native name or ISO code.
    pub fn lookup(s: &str) -> Option<&'static Language> {
        let needle = s.trim();
        if needle.is_empty() {
            return None;
        }
        LANGUAGES.iter().find(|l| {
            l.name.eq_ignore_ascii_case(needle)
                || l.code.eq_ignore_ascii_case(needle)
                || l.native_name.to_lowercase() == needle.to_lowercase()
        })
    }

    /// Table name for known languages, trimmed input otherwise.
    pub fn canonical_name(s: &str) -> String {
        match Self::lookup(s) {
            Some(l) => l.name.to_string(),
            None => s.trim().to_string(),
        }
    }

    pub fn display_name(s: &str) -> String {
        match Self::lookup(s) {
            Some(l) => l.native_name.to_string(),
            None => s.trim().to_string(),
        }
    }
}
