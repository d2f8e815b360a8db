//! furigana-rs - furigana markup generator for Japanese text
//!
//! Pairs each word with its reading and annotates only the kanji stem,
//! leaving shared okurigana bare.

pub mod annotator;
pub mod config;
pub mod error;
pub mod kana;
pub mod renderer;
pub mod segmenter;
pub mod service;
