//! Markup rendering for annotated tokens, lines and whole texts.

use serde::{Deserialize, Serialize};

use crate::annotator::{annotate, Annotation};
use crate::config::RenderConfig;
use crate::kana::{is_katakana, to_hiragana};
use crate::segmenter::{Segmenter, Token};

/// Output markup scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MarkupFormat {
    /// `<ruby>` elements inside per-word `<span>` wrappers, lines joined by `<br>`
    #[default]
    Html,
    /// Aozora Bunko ruby notation: `｜食《た》べる`
    Aozora,
}

impl MarkupFormat {
    /// Marker placed between rendered lines
    pub fn line_break(&self) -> &'static str {
        match self {
            MarkupFormat::Html => "<br>",
            MarkupFormat::Aozora => "\n",
        }
    }
}

/// Resolve the hiragana reading used to annotate `token`.
///
/// Unknown readings fall back to the surface itself, normalized when the
/// surface is pure katakana.
pub fn resolve_reading(token: &Token) -> String {
    match &token.reading {
        Some(reading) => to_hiragana(reading),
        None if is_katakana(&token.surface_form) => to_hiragana(&token.surface_form),
        None => token.surface_form.clone(),
    }
}

/// Renders tokens into furigana markup
#[derive(Debug, Clone)]
pub struct Renderer {
    format: MarkupFormat,
    word_class: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            format: config.format,
            word_class: config.word_class.clone(),
        }
    }

    pub fn format(&self) -> MarkupFormat {
        self.format
    }

    /// Render one decomposition without a word wrapper.
    pub fn render_annotation(&self, annotation: &Annotation<'_>, out: &mut String) {
        match *annotation {
            Annotation::Plain(text) | Annotation::Unannotated(text) => self.push_text(text, out),
            Annotation::FullyAnnotated { base, reading } => self.push_ruby(base, reading, out),
            Annotation::PartiallyAnnotated {
                base,
                reading_base,
                suffix,
            } => {
                self.push_ruby(base, reading_base, out);
                self.push_text(suffix, out);
            }
        }
    }

    /// Render a single token wrapped in its word-boundary marker.
    pub fn render_token(&self, token: &Token) -> String {
        let reading = resolve_reading(token);
        let annotation = annotate(&token.surface_form, &reading);

        let mut out = String::new();
        match self.format {
            MarkupFormat::Html => {
                out.push_str(&format!("<span class=\"{}\">", escape_html(&self.word_class)));
                self.render_annotation(&annotation, &mut out);
                out.push_str("</span>");
            }
            MarkupFormat::Aozora => self.render_annotation(&annotation, &mut out),
        }
        out
    }

    /// Render a tokenized line. Token markups are concatenated with no separator.
    pub fn render_line(&self, tokens: &[Token]) -> String {
        tokens.iter().map(|token| self.render_token(token)).collect()
    }

    /// Split `text` into lines, render each non-blank line and join the
    /// results with the format's line break. Blank lines render empty but
    /// keep their position.
    pub fn render_text<S: Segmenter + ?Sized>(&self, segmenter: &S, text: &str) -> String {
        text.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .enumerate()
            .map(|(i, line)| {
                if line.trim().is_empty() {
                    return String::new();
                }
                let tokens = segmenter.tokenize(line);
                tracing::debug!("Line {}: {} tokens", i, tokens.len());
                self.render_line(&tokens)
            })
            .collect::<Vec<_>>()
            .join(self.format.line_break())
    }

    fn push_text(&self, text: &str, out: &mut String) {
        match self.format {
            MarkupFormat::Html => out.push_str(&escape_html(text)),
            MarkupFormat::Aozora => out.push_str(&escape_aozora(text)),
        }
    }

    fn push_ruby(&self, base: &str, reading: &str, out: &mut String) {
        match self.format {
            MarkupFormat::Html => {
                out.push_str(&format!(
                    "<ruby>{}<rt>{}</rt></ruby>",
                    escape_html(base),
                    escape_html(reading)
                ));
            }
            MarkupFormat::Aozora => {
                out.push_str(&format!(
                    "｜{}《{}》",
                    escape_aozora(base),
                    escape_aozora(reading)
                ));
            }
        }
    }
}

/// Replace ruby delimiters with their Aozora Bunko annotation forms so
/// literal `｜《》` in the text are not read as ruby markers.
fn escape_aozora(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '｜' => escaped.push_str("※［＃縦線、1-1-35］"),
            '《' => escaped.push_str("※［＃始め二重山括弧、1-1-52］"),
            '》' => escaped.push_str("※［＃終わり二重山括弧、1-1-53］"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
