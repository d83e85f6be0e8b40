//! Line filter for converted page text
//!
//! Rendered documentation pages carry injected analytics snippets, minified
//! style blocks and zero-width characters. After HTML-to-Markdown conversion
//! these survive as long, symbol-heavy lines. This module drops such lines while
//! keeping anything that looks like Markdown structure, including links that the
//! converter split across two lines.
//!
//! The filter is a heuristic, not a parser:
//!
//! | Check | Effect |
//! |-------|--------|
//! | Heading, list, quote, fence, rule, link, lone `[` | Always kept |
//! | Line starting with `](` after a `[text]` or lone `[` line | Always kept |
//! | Longer than `max_line_length` characters | Removed |
//! | Script or CSS-variable marker | Removed |
//! | Symbol ratio above `max_symbol_ratio` | Removed |

mod batch;

pub use batch::{sanitize_directory, SanitizeSummary};

use crate::config::SanitizerSettings;
use regex::Regex;
use std::sync::LazyLock;

/// Zero-width space, non-joiner, joiner, word joiner and byte-order mark
const INVISIBLE_CHARS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

static LONE_BRACKET_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\[\]]*\]$").expect("hardcoded regex pattern is valid"));

static BLOCK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6}(\s|$)|\d+\.(\s|$)|\*\s|```|>(\s|$)|-{3,}$|_{3,}$|\*{3,}$)")
        .expect("hardcoded regex pattern is valid")
});

static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s(*_>])!?\[[^\[\]]*\]\([^()\s]*\)").expect("hardcoded regex pattern is valid")
});

static OPENING_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\[|\[\[|\(\()$").expect("hardcoded regex pattern is valid"));

static NOISE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"!function",
        r"|\bfunction\s*[\w$]*\s*\([^)]*\)\s*\{",
        r"|=>\s*\{",
        r"|\bwindow\.",
        r"|\bdocument\.",
        r"|:where\(",
        r"|var\(--",
        r"|--[A-Za-z][\w-]*\s*:",
        r"|-{4,}",
    ))
    .expect("hardcoded regex pattern is valid")
});

/// Why a line was classified as noise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseReason {
    TooLong,
    ScriptMarker,
    SymbolHeavy,
}

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Looks like Markdown structure; always kept
    Markdown,
    /// Closing half of a link split across lines; always kept
    LinkContinuation,
    /// Ordinary text; kept
    Content,
    /// Script or style residue; removed
    Noise(NoiseReason),
}

impl LineKind {
    pub fn is_kept(&self) -> bool {
        !matches!(self, Self::Noise(_))
    }
}

/// Output of one sanitizer pass
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub text: String,
    pub removed_lines: usize,
}

/// Removes script and style noise from line-oriented text
#[derive(Debug, Clone)]
pub struct Sanitizer {
    max_line_length: usize,
    max_symbol_ratio: f64,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(&SanitizerSettings::default())
    }
}

impl Sanitizer {
    pub fn new(settings: &SanitizerSettings) -> Self {
        Self {
            max_line_length: settings.max_line_length,
            max_symbol_ratio: settings.max_symbol_ratio,
        }
    }

    /// Cleans a whole document
    ///
    /// Invisible characters are stripped from every line. Kept lines are emitted
    /// verbatim otherwise, rejoined with `\n`, and the result is trimmed.
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_scribe::sanitize::Sanitizer;
    ///
    /// let raw = "### Install\n!function(t,e){window.posthog=e}\nRun the installer.";
    /// let cleaned = Sanitizer::default().clean(raw);
    /// assert_eq!(cleaned.text, "### Install\nRun the installer.");
    /// assert_eq!(cleaned.removed_lines, 1);
    /// ```
    pub fn clean(&self, text: &str) -> Cleaned {
        let lines: Vec<String> = text.lines().map(strip_invisible).collect();
        let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
        let mut removed_lines = 0;
        let mut previous: Option<&str> = None;

        for line in &lines {
            match self.classify(line, previous) {
                LineKind::Noise(reason) => {
                    tracing::trace!(?reason, "Removed: {}", preview(line));
                    removed_lines += 1;
                }
                _ => kept.push(line),
            }
            if !line.trim().is_empty() {
                previous = Some(line.as_str());
            }
        }

        Cleaned {
            text: kept.join("\n").trim().to_string(),
            removed_lines,
        }
    }

    /// Classifies one line given the last non-blank line before it
    ///
    /// Both lines are expected to be stripped of invisible characters already.
    pub fn classify(&self, line: &str, previous: Option<&str>) -> LineKind {
        let trimmed = line.trim();

        if is_likely_markdown(trimmed) {
            return LineKind::Markdown;
        }

        if is_link_continuation(previous, trimmed) {
            return LineKind::LinkContinuation;
        }

        if line.chars().count() > self.max_line_length {
            return LineKind::Noise(NoiseReason::TooLong);
        }

        if NOISE_MARKER.is_match(line) {
            return LineKind::Noise(NoiseReason::ScriptMarker);
        }

        if symbol_ratio(line) > self.max_symbol_ratio {
            return LineKind::Noise(NoiseReason::SymbolHeavy);
        }

        LineKind::Content
    }
}

/// Cleans text with the default thresholds
pub fn sanitize(text: &str) -> String {
    Sanitizer::default().clean(text).text
}

/// Removes zero-width and other invisible formatting characters
pub fn strip_invisible(line: &str) -> String {
    line.chars().filter(|c| !INVISIBLE_CHARS.contains(c)).collect()
}

fn is_likely_markdown(trimmed: &str) -> bool {
    LONE_BRACKET_PAIR.is_match(trimmed)
        || BLOCK_MARKER.is_match(trimmed)
        || INLINE_LINK.is_match(trimmed)
        || OPENING_TOKEN.is_match(trimmed)
}

/// `](target)` closing a link whose text sits alone on an earlier line
fn is_link_continuation(previous: Option<&str>, trimmed: &str) -> bool {
    trimmed.starts_with("](")
        && previous.is_some_and(|previous| {
            let previous = previous.trim();
            previous == "[" || LONE_BRACKET_PAIR.is_match(previous)
        })
}

/// Share of characters that are neither word characters nor whitespace
fn symbol_ratio(line: &str) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }

    let symbols = line
        .chars()
        .filter(|c| !(c.is_alphanumeric() || *c == '_' || c.is_whitespace()))
        .count();

    symbols as f64 / total as f64
}

fn preview(line: &str) -> String {
    line.chars().take(80).collect()
}
