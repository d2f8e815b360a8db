//! Kana classification and katakana to hiragana normalization.

/// Long-vowel mark (長音符). Shared by both syllabaries, never shifted.
const LONG_VOWEL_MARK: char = 'ー';

/// Distance between a katakana code point and its hiragana counterpart.
const KATAKANA_OFFSET: u32 = 0x60;

/// Returns true if `c` lies in the hiragana block (U+3040–U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

fn is_katakana_char(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Returns true if `text` is non-empty and every character lies in the
/// katakana block (U+30A0–U+30FF).
pub fn is_katakana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_katakana_char)
}

/// Map every katakana character to hiragana, leaving `ー` and non-katakana
/// characters untouched.
pub fn to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c == LONG_VOWEL_MARK || !is_katakana_char(c) {
                return c;
            }
            char::from_u32(c as u32 - KATAKANA_OFFSET).unwrap_or(c)
        })
        .collect()
}
