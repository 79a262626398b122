// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use prism_translate::services::prompt::{SYSTEM_PROMPT, user_prompt};

#[test]
fn user_prompt_lists_languages() {
    let prompt = user_prompt("Good morning", &["Japanese", "French", "German"]);
    insta::assert_snapshot!(
        prompt,
        @r#"Translate this text: "Good morning" into these languages: Japanese, French, German."#
    );
}

#[test]
fn user_prompt_single_language() {
    let prompt = user_prompt("Ship it", &[String::from("Korean")]);
    insta::assert_snapshot!(
        prompt,
        @r#"Translate this text: "Ship it" into these languages: Korean."#
    );
}

#[test]
fn user_prompt_keeps_text_verbatim() {
    let text = "Line one\nLine \"two\"";
    let prompt = user_prompt(text, &["Spanish"]);
    assert!(prompt.contains(text));
}

#[test]
fn system_prompt_describes_schema() {
    for field in ["\"language\"", "\"code\"", "\"text\"", "\"tone\"", "\"confidence\""] {
        assert!(SYSTEM_PROMPT.contains(field), "missing {field}");
    }
    assert!(SYSTEM_PROMPT.contains("JSON array"));
    assert!(SYSTEM_PROMPT.contains("between 0 and 100"));
}
