// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use libfuzzer_sys::fuzz_target;
use prism_translate::services::parser::ResponseParser;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(json) = ResponseParser::extract_json(s) {
            assert!(json.starts_with('['));
            assert!(json.ends_with(']'));
        }
        let _ = ResponseParser::parse(s);
    }
});
