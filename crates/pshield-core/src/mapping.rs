//! Reverse lookup from placeholder to original value
//!
//! A `MappingStore` belongs to exactly one `protect` run and is never merged
//! with the store of another document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::placeholder::find_display_placeholders;

/// Localized placeholder -> canonical placeholder, produced by label localization
pub type Aliases = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingStore {
    entries: BTreeMap<String, String>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `placeholder -> original`.
    ///
    /// Re-recording an existing placeholder is a no-op and returns `false`;
    /// the first recorded value always wins.
    pub fn record(&mut self, placeholder: impl Into<String>, original: impl Into<String>) -> bool {
        let placeholder = placeholder.into();
        if self.entries.contains_key(&placeholder) {
            return false;
        }
        self.entries.insert(placeholder, original.into());
        true
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(String::as_str)
    }

    /// Look up a placeholder, following a localization alias if needed
    pub fn resolve<'a>(&'a self, token: &str, aliases: &Aliases) -> Option<&'a str> {
        self.get(token).or_else(|| {
            aliases
                .get(token)
                .and_then(|canonical| self.get(canonical))
        })
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.entries.contains_key(placeholder)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every placeholder in `text` that has an entry with its original value.
    ///
    /// Placeholders without an entry (normalized codes, foreign placeholders)
    /// are left as they are.
    pub fn restore(&self, text: &str, aliases: &Aliases) -> String {
        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;

        for span in find_display_placeholders(text) {
            if let Some(original) = self.resolve(&span.token, aliases) {
                result.push_str(&text[cursor..span.start]);
                result.push_str(original);
                cursor = span.end;
            }
        }

        result.push_str(&text[cursor..]);
        result
    }
}

impl FromIterator<(String, String)> for MappingStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (placeholder, original) in iter {
            store.record(placeholder, original);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MappingStore {
        let mut store = MappingStore::new();
        store.record("[EMAIL_1]", "a@x.com");
        store.record("[NAME_1]", "Bob");
        store
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut store = sample();
        assert!(!store.record("[EMAIL_1]", "a@x.com"));
        assert!(!store.record("[EMAIL_1]", "other@x.com"));
        assert_eq!(store.get("[EMAIL_1]"), Some("a@x.com"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_restore() {
        let store = sample();
        let restored = store.restore("[NAME_1] wrote to [EMAIL_1] about XXX-000", &Aliases::new());
        assert_eq!(restored, "Bob wrote to a@x.com about XXX-000");
    }

    #[test]
    fn test_restore_leaves_unknown_placeholders() {
        let store = sample();
        let restored = store.restore("[PHONE_1] and [EMAIL_1]", &Aliases::new());
        assert_eq!(restored, "[PHONE_1] and a@x.com");
    }

    #[test]
    fn test_resolve_through_alias() {
        let store = sample();
        let mut aliases = Aliases::new();
        aliases.insert("[NOM_1]".to_string(), "[NAME_1]".to_string());

        assert_eq!(store.resolve("[NOM_1]", &aliases), Some("Bob"));
        assert_eq!(store.resolve("[NOM_1]", &Aliases::new()), None);
        assert_eq!(store.restore("[NOM_1]!", &aliases), "Bob!");
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let store = sample();
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"[EMAIL_1]": "a@x.com", "[NAME_1]": "Bob"})
        );
        let back: MappingStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }
}
