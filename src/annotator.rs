//! Suffix-aware ruby annotation.
//!
//! Decides which part of a surface form receives a reading. Okurigana shared
//! between the surface and its reading is left outside the annotation, so
//! `食べる` / `たべる` becomes `食` annotated with `た`, followed by `べる`.

use crate::kana::is_hiragana;

/// Outcome of annotating one surface form with its reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation<'a> {
    /// Surface and reading are identical; nothing to annotate.
    Plain(&'a str),
    /// No shared kana suffix; the whole surface carries the reading.
    FullyAnnotated { base: &'a str, reading: &'a str },
    /// Only `base` carries `reading_base`; `suffix` follows unannotated.
    PartiallyAnnotated {
        base: &'a str,
        reading_base: &'a str,
        suffix: &'a str,
    },
    /// The whole surface was shared kana; render as plain text.
    Unannotated(&'a str),
}

impl<'a> Annotation<'a> {
    /// Text that carries the reading, if any.
    pub fn base(&self) -> Option<&'a str> {
        match *self {
            Annotation::FullyAnnotated { base, .. }
            | Annotation::PartiallyAnnotated { base, .. } => Some(base),
            Annotation::Plain(_) | Annotation::Unannotated(_) => None,
        }
    }

    /// Reading attached to [`Annotation::base`].
    pub fn reading(&self) -> Option<&'a str> {
        match *self {
            Annotation::FullyAnnotated { reading, .. } => Some(reading),
            Annotation::PartiallyAnnotated { reading_base, .. } => Some(reading_base),
            Annotation::Plain(_) | Annotation::Unannotated(_) => None,
        }
    }

    /// Unannotated text following the annotated base. Empty when there is none.
    pub fn suffix(&self) -> &'a str {
        match *self {
            Annotation::PartiallyAnnotated { suffix, .. } => suffix,
            _ => "",
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.base().is_some()
    }
}

/// Annotate `surface` with `reading`.
///
/// `reading` must already be normalized to hiragana. The shared suffix is
/// found by a greedy backward scan that stops at the first position where
/// the characters differ or are not hiragana; kana matching further toward
/// the front of the word after such a mismatch is not considered.
pub fn annotate<'a>(surface: &'a str, reading: &'a str) -> Annotation<'a> {
    if surface == reading {
        return Annotation::Plain(surface);
    }

    // Matched characters are identical, so the byte length is the same in both.
    let suffix_len: usize = surface
        .chars()
        .rev()
        .zip(reading.chars().rev())
        .take_while(|&(s, r)| s == r && is_hiragana(s))
        .map(|(s, _)| s.len_utf8())
        .sum();

    if suffix_len == 0 {
        return Annotation::FullyAnnotated {
            base: surface,
            reading,
        };
    }

    let (base, suffix) = surface.split_at(surface.len() - suffix_len);
    let reading_base = &reading[..reading.len() - suffix_len];

    if base.is_empty() {
        return Annotation::Unannotated(surface);
    }

    Annotation::PartiallyAnnotated {
        base,
        reading_base,
        suffix,
    }
}
