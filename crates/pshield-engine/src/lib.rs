//! The `protect` entry point: redaction followed by optional label localization

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use pshield_core::{ProtectOptions, ProtectOutcome};
use pshield_locale::{
    DEFAULT_LANGUAGE, DictionaryTranslator, LanguageIdentifier, Translator, WhatlangIdentifier,
    localize_placeholders,
};
use pshield_security::{RedactionInfo, Redactor, RuleTable};

/// Default time limit for one label translation
pub const DEFAULT_TRANSLATION_TIMEOUT: Duration = Duration::from_secs(3);

/// The `protect` entry point: redaction followed by optional label localization.
///
/// A `Shield` is shared read-only state (rules, locale adapter). Every call to
/// `protect` builds its own placeholder numbering and mapping.
#[derive(Clone)]
pub struct Shield {
    redactor: Arc<Redactor>,
    identifier: Arc<dyn LanguageIdentifier>,
    translator: Arc<dyn Translator>,
    default_language: String,
    translation_timeout: Duration,
}

impl Shield {
    pub fn new(redactor: Redactor) -> Self {
        Self {
            redactor: Arc::new(redactor),
            identifier: Arc::new(WhatlangIdentifier::new()),
            translator: Arc::new(DictionaryTranslator::builtin()),
            default_language: DEFAULT_LANGUAGE.to_string(),
            translation_timeout: DEFAULT_TRANSLATION_TIMEOUT,
        }
    }

    pub fn with_identifier(mut self, identifier: Arc<dyn LanguageIdentifier>) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into().to_lowercase();
        self
    }

    pub fn with_translation_timeout(mut self, timeout: Duration) -> Self {
        self.translation_timeout = timeout;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        self.redactor.rules()
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Declared language, else detected, else the default
    fn resolve_language(&self, text: &str, options: &ProtectOptions) -> String {
        if let Some(language) = options
            .target_language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            return language.to_lowercase();
        }

        match self.identifier.identify(text) {
            Some(language) => language,
            None => {
                debug!(default = %self.default_language, "language not identified, using default");
                self.default_language.clone()
            }
        }
    }

    pub async fn protect(&self, text: &str, options: &ProtectOptions) -> ProtectOutcome {
        self.protect_detailed(text, options).await.0
    }

    /// `protect`, plus per-type counts of what was substituted
    pub async fn protect_detailed(
        &self,
        text: &str,
        options: &ProtectOptions,
    ) -> (ProtectOutcome, Vec<RedactionInfo>) {
        let redaction = self.redactor.redact(text, options.numbering);
        let entity_count = redaction.entity_count();
        let summary = redaction.summary();

        let mut outcome = ProtectOutcome {
            result: redaction.text,
            mapping: redaction.mapping,
            entity_count,
            ..Default::default()
        };

        if !options.translate_placeholders || outcome.mapping.is_empty() {
            info!(entities = entity_count, "text protected");
            return (outcome, summary);
        }

        let language = self.resolve_language(text, options);
        if language != self.default_language {
            let localized = localize_placeholders(
                &outcome.result,
                &language,
                self.translator.as_ref(),
                self.translation_timeout,
            )
            .await;
            outcome.result = localized.text;
            outcome.aliases = localized.aliases;
        }

        info!(entities = entity_count, language = %language, "text protected");
        outcome.language = Some(language);
        (outcome, summary)
    }
}

impl Default for Shield {
    fn default() -> Self {
        Self::new(Redactor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pshield_locale::FixedLanguage;

    #[tokio::test]
    async fn test_default_language_skips_localization() {
        let shield = Shield::default().with_identifier(Arc::new(FixedLanguage("en".into())));
        let outcome = shield
            .protect("Contact me at john.doe@example.com", &ProtectOptions::default())
            .await;

        assert_eq!(outcome.result, "Contact me at [EMAIL_1]");
        assert!(outcome.aliases.is_empty());
        assert_eq!(outcome.language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_declared_language_wins_over_detection() {
        let shield = Shield::default().with_identifier(Arc::new(FixedLanguage("en".into())));
        let outcome = shield
            .protect("write to a@x.com", &ProtectOptions::default().with_language("FR"))
            .await;

        assert_eq!(outcome.result, "write to [E-MAIL_1]");
        assert_eq!(outcome.language.as_deref(), Some("fr"));
        assert_eq!(outcome.reveal(), "write to a@x.com");
    }

    #[tokio::test]
    async fn test_detected_language_is_used() {
        let shield = Shield::default().with_identifier(Arc::new(FixedLanguage("de".into())));
        let outcome = shield.protect("an a@x.com", &ProtectOptions::default()).await;
        assert_eq!(outcome.result, "an [E-MAIL_1]");
    }

    #[tokio::test]
    async fn test_untranslated_option() {
        let shield = Shield::default();
        let outcome = shield
            .protect(
                "write to a@x.com",
                &ProtectOptions::untranslated().with_language("fr"),
            )
            .await;

        assert_eq!(outcome.result, "write to [EMAIL_1]");
        assert_eq!(outcome.language, None);
    }

    #[tokio::test]
    async fn test_empty_text() {
        let outcome = Shield::default().protect("", &ProtectOptions::default()).await;
        assert_eq!(outcome.result, "");
        assert!(outcome.mapping.is_empty());
        assert_eq!(outcome.entity_count, 0);
    }

    #[tokio::test]
    async fn test_detailed_summary() {
        let (outcome, summary) = Shield::default()
            .protect_detailed("a@x.com b@y.org ORD-1234", &ProtectOptions::untranslated())
            .await;

        assert_eq!(outcome.entity_count, 3);
        let counts: Vec<(&str, usize)> = summary
            .iter()
            .map(|info| (info.entity_type.as_str(), info.count))
            .collect();
        assert_eq!(counts, vec![("code", 1), ("email", 2)]);
    }

    #[tokio::test]
    async fn test_normalize_only_text_is_not_localized() {
        let shield = Shield::default().with_identifier(Arc::new(FixedLanguage("fr".into())));
        let outcome = shield.protect("Ticket ORD-123456", &ProtectOptions::default()).await;

        assert_eq!(outcome.result, "Ticket XXX-000000");
        assert_eq!(outcome.entity_count, 1);
        assert!(outcome.mapping.is_empty());
    }
}
