// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    vowel_start = {"apple", "an"},
    consonant_start = {"sword", "a"},
    uppercase_vowel = {"Orc", "an"},
)]
fn indefinite_article_cases(noun: &str, expected: &str) {
    assert_eq!(indefinite_article(noun), expected);
}

#[yare::parameterized(
    plain = {"sword", "swords"},
    sibilant_s = {"bus", "buses"},
    sibilant_x = {"box", "boxes"},
    ch_ending = {"torch", "torches"},
    sh_ending = {"brush", "brushes"},
    consonant_y = {"city", "cities"},
    vowel_y = {"day", "days"},
)]
fn pluralize_cases(noun: &str, expected: &str) {
    assert_eq!(pluralize(noun), expected);
}
