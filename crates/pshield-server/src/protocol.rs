//! Request and response bodies of the HTTP boundary

use serde::{Deserialize, Serialize};

use pshield_core::{Aliases, MappingStore, NumberingOrder, ProtectOptions};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymizeRequest {
    pub text: String,
    #[serde(default)]
    pub translate_placeholders: Option<bool>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub numbering: Option<NumberingOrder>,
}

impl AnonymizeRequest {
    /// Fields set in the request override the server defaults
    pub fn options(&self, defaults: &ProtectOptions) -> ProtectOptions {
        ProtectOptions {
            translate_placeholders: self
                .translate_placeholders
                .unwrap_or(defaults.translate_placeholders),
            target_language: self
                .target_language
                .clone()
                .or_else(|| defaults.target_language.clone()),
            numbering: self.numbering.unwrap_or(defaults.numbering),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RevealRequest {
    pub text: String,
    pub mapping: MappingStore,
    #[serde(default)]
    pub aliases: Aliases,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevealResponse {
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_overrides_defaults() {
        let request: AnonymizeRequest = serde_json::from_str(
            r#"{"text":"hi","translatePlaceholders":false,"targetLanguage":"de"}"#,
        )
        .unwrap();
        let options = request.options(&ProtectOptions::default());

        assert!(!options.translate_placeholders);
        assert_eq!(options.target_language.as_deref(), Some("de"));
        assert_eq!(options.numbering, NumberingOrder::Processing);
    }

    #[test]
    fn test_bare_text_request_keeps_defaults() {
        let request: AnonymizeRequest = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        let defaults = ProtectOptions::untranslated().with_numbering(NumberingOrder::Text);
        assert_eq!(request.options(&defaults), defaults);
    }
}
