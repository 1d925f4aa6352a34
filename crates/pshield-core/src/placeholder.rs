//! Placeholder wire format
//!
//! A placeholder is `[` + upper-case, underscore separated label + `_` +
//! positive decimal index without leading zero + `]`, e.g. `[CREDIT_CARD_2]`.
//! The label may itself contain underscores; the index is always the digits
//! after the last underscore.
//!
//! Localized placeholders (label translated into another language) do not fit
//! the strict grammar, so display code scans with a looser pattern that only
//! requires `[<label>_<index>]` with no whitespace or brackets in the label.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, EntityType, Result};

lazy_static! {
    static ref PLACEHOLDER_PATTERN: Regex =
        Regex::new(r"\[([A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*)_([1-9][0-9]*)\]").unwrap();
    static ref DISPLAY_PATTERN: Regex =
        Regex::new(r"\[([^\[\]\s]+)_([1-9][0-9]*)\]").unwrap();
    static ref EXACT_PLACEHOLDER: Regex =
        Regex::new(r"^\[([A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*)_([1-9][0-9]*)\]$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    label: String,
    index: u32,
}

impl Placeholder {
    pub fn new(entity_type: &EntityType, index: u32) -> Self {
        debug_assert!(index > 0, "placeholder indices start at 1");
        Self {
            label: entity_type.label(),
            index,
        }
    }

    /// Parse a canonical placeholder such as `[EMAIL_1]`
    pub fn parse(token: &str) -> Result<Self> {
        let caps = EXACT_PLACEHOLDER
            .captures(token)
            .ok_or_else(|| CoreError::InvalidPlaceholder(token.to_string()))?;
        let index = caps[2]
            .parse()
            .map_err(|_| CoreError::InvalidPlaceholder(token.to_string()))?;

        Ok(Self {
            label: caps[1].to_string(),
            index,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Entity-type name this placeholder was built from (`CREDIT_CARD` -> `credit_card`)
    pub fn entity_name(&self) -> String {
        self.label.to_ascii_lowercase()
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}_{}]", self.label, self.index)
    }
}

impl FromStr for Placeholder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One placeholder occurrence located in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpan {
    pub start: usize,
    pub end: usize,
    /// The token exactly as it appears in the text
    pub token: String,
    pub label: String,
    pub index: u32,
}

/// Find all canonical placeholders in `text`, in text order
pub fn find_placeholders(text: &str) -> Vec<PlaceholderSpan> {
    scan(&PLACEHOLDER_PATTERN, text)
}

/// Find canonical and localized placeholders in `text`, in text order
pub fn find_display_placeholders(text: &str) -> Vec<PlaceholderSpan> {
    scan(&DISPLAY_PATTERN, text)
}

fn scan(pattern: &Regex, text: &str) -> Vec<PlaceholderSpan> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps[2].parse().ok()?;
            Some(PlaceholderSpan {
                start: whole.start(),
                end: whole.end(),
                token: whole.as_str().to_string(),
                label: caps[1].to_string(),
                index,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let ty = EntityType::new("credit_card").unwrap();
        assert_eq!(Placeholder::new(&ty, 3).to_string(), "[CREDIT_CARD_3]");
    }

    #[test]
    fn test_parse_multi_word_label() {
        let p = Placeholder::parse("[CRYPTOCURRENCY_ADDRESS_12]").unwrap();
        assert_eq!(p.label(), "CRYPTOCURRENCY_ADDRESS");
        assert_eq!(p.index(), 12);
        assert_eq!(p.entity_name(), "cryptocurrency_address");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "[EMAIL_0]",
            "[EMAIL_01]",
            "[email_1]",
            "[EMAIL]",
            "EMAIL_1",
            "[EMAIL_1] ",
            "[_1]",
        ] {
            assert!(Placeholder::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_find_placeholders() {
        let text = "Mail [EMAIL_1] or call [PHONE_2], not [NOM_1x] or [E-MAIL_1]";
        let found = find_placeholders(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].token, "[EMAIL_1]");
        assert_eq!(&text[found[0].start..found[0].end], "[EMAIL_1]");
        assert_eq!(found[1].label, "PHONE");
        assert_eq!(found[1].index, 2);
    }

    #[test]
    fn test_find_display_placeholders_accepts_localized() {
        let text = "[E-MAIL_1] et [TÉLÉPHONE_2] et [CREDIT_CARD_1]";
        let found = find_display_placeholders(text);
        let tokens: Vec<&str> = found.iter().map(|s| s.token.as_str()).collect();
        assert_eq!(tokens, vec!["[E-MAIL_1]", "[TÉLÉPHONE_2]", "[CREDIT_CARD_1]"]);
        assert_eq!(found[2].label, "CREDIT_CARD");
    }
}
