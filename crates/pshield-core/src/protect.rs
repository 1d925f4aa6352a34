//! Protect request/outcome types
//!
//! One `protect` call owns its placeholder numbering and mapping from start to
//! finish; nothing in these types is shared between calls.

use serde::{Deserialize, Serialize};

use crate::mapping::{Aliases, MappingStore};

/// Order in which placeholder numbers are handed out within one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingOrder {
    /// Numbers are assigned while substituting, rightmost match first
    #[default]
    Processing,
    /// Numbers follow the order values first appear in the text
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectOptions {
    #[serde(default = "default_translate")]
    pub translate_placeholders: bool,

    /// Language for placeholder labels; `None` means detect from the text
    #[serde(default)]
    pub target_language: Option<String>,

    #[serde(default)]
    pub numbering: NumberingOrder,
}

fn default_translate() -> bool {
    true
}

impl Default for ProtectOptions {
    fn default() -> Self {
        Self {
            translate_placeholders: default_translate(),
            target_language: None,
            numbering: NumberingOrder::default(),
        }
    }
}

impl ProtectOptions {
    pub fn untranslated() -> Self {
        Self {
            translate_placeholders: false,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }

    pub fn with_numbering(mut self, numbering: NumberingOrder) -> Self {
        self.numbering = numbering;
        self
    }
}

/// Result of one `protect` run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectOutcome {
    pub result: String,
    pub mapping: MappingStore,
    #[serde(default, skip_serializing_if = "Aliases::is_empty")]
    pub aliases: Aliases,
    pub entity_count: usize,
    /// Language the placeholder labels were written in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ProtectOutcome {
    /// Swap every reversible placeholder in `result` back to its original value
    pub fn reveal(&self) -> String {
        self.mapping.restore(&self.result, &self.aliases)
    }
}
