// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! English-grammar utilities. Small, deliberately naive — good enough for
//! scaffolding room/object descriptions, not a real pluralizer or article
//! chooser.

/// "a" or "an", based on whether `noun` starts with a vowel letter.
/// Does not attempt to handle silent-h or vowel-sound exceptions
/// ("an hour", "a unicorn").
pub fn indefinite_article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    }
}

/// Naive English pluralization: "-s" by default, "-es" after a sibilant
/// ending, "-ies" replacing a trailing consonant + "y".
pub fn pluralize(noun: &str) -> String {
    if noun.ends_with(['s', 'x', 'z']) || noun.ends_with("ch") || noun.ends_with("sh") {
        return format!("{noun}es");
    }
    let mut chars = noun.chars();
    if let Some(last) = chars.next_back() {
        if last == 'y' {
            if let Some(second_last) = chars.next_back() {
                if !"aeiouAEIOU".contains(second_last) {
                    return format!("{}ies", &noun[..noun.len() - 1]);
                }
            }
        }
    }
    format!("{noun}s")
}

#[cfg(test)]
#[path = "grammar_tests.rs"]
mod tests;
