//! External recognizer seam
//!
//! Named-entity recognition lives outside the engine. A recognizer gets the
//! whole text once per run and returns spans with byte offsets and the text it
//! matched. Recognizers may include trailing punctuation in a span; the
//! detector trims it before the span becomes a candidate.

use anyhow::{Result, bail};
use regex::Regex;

use pshield_core::CoreError;

/// Characters trimmed from the end of recognizer spans
pub const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl RecognizedSpan {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

pub trait EntityRecognizer: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>>;
}

/// Validate a recognizer span against the text and trim trailing punctuation.
///
/// Returns `Ok(None)` when nothing is left after trimming.
pub(crate) fn clip_span(text: &str, span: &RecognizedSpan) -> Result<Option<(usize, usize)>> {
    let (start, end) = (span.start, span.end);
    if start >= end
        || end > text.len()
        || !text.is_char_boundary(start)
        || !text.is_char_boundary(end)
    {
        bail!("span {}..{} is outside the text or splits a character", start, end);
    }
    if text[start..end] != span.text {
        bail!("span {}..{} does not match the reported text", start, end);
    }

    let trimmed = text[start..end].trim_end_matches(TRAILING_PUNCTUATION);
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some((start, start + trimmed.len())))
}

/// Finds a fixed list of names as whole words.
///
/// Matching is case-sensitive and prefers the longest name at a position, so
/// "John Doe" wins over "John".
pub struct GazetteerRecognizer {
    pattern: Option<Regex>,
    names: usize,
}

impl GazetteerRecognizer {
    pub fn new<I, S>(names: I) -> pshield_core::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        if names.is_empty() {
            return Ok(Self {
                pattern: None,
                names: 0,
            });
        }

        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{})\b", alternation)).map_err(|source| {
            CoreError::InvalidPattern {
                rule: "name".to_string(),
                source,
            }
        })?;

        Ok(Self {
            pattern: Some(pattern),
            names: names.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names == 0
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn name(&self) -> &str {
        "gazetteer"
    }

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>> {
        let Some(pattern) = &self.pattern else {
            return Ok(Vec::new());
        };

        Ok(pattern
            .find_iter(text)
            .map(|m| RecognizedSpan::new(m.start(), m.end(), m.as_str()))
            .collect())
    }
}
