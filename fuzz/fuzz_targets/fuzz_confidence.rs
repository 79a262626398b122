// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use libfuzzer_sys::fuzz_target;
use prism_translate::domain::TranslationResult;

fuzz_target!(|data: &[u8]| {
    if let Ok(result) = serde_json::from_slice::<TranslationResult>(data) {
        assert!((0.0..=100.0).contains(&result.confidence));
    }
});
