//! Placeholder label localization
//!
//! Every canonical placeholder occurrence in the text gets its own translation
//! call. Calls run concurrently and the answers are put back by occurrence
//! index, so completion order never affects the output. An occurrence whose
//! call fails, times out or returns an unusable label keeps its canonical form.

use futures_util::future::join_all;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use pshield_core::{Aliases, PlaceholderSpan, find_placeholders};

use crate::error::{LocaleError, Result};
use crate::translate::Translator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText {
    pub text: String,
    /// Localized placeholder -> canonical placeholder
    pub aliases: Aliases,
    pub translated: usize,
    pub failed: usize,
}

/// Turn a translated entity name into a placeholder label (`carte bancaire` -> `CARTE_BANCAIRE`)
pub fn format_label(translation: &str) -> Result<String> {
    let label = translation
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase();

    if label.is_empty() || label.contains(['[', ']']) {
        return Err(LocaleError::InvalidTranslation(translation.to_string()));
    }
    Ok(label)
}

/// `CREDIT_CARD` -> `credit card`
fn entity_name(label: &str) -> String {
    label.to_lowercase().replace('_', " ")
}

async fn translate_occurrence(
    span: &PlaceholderSpan,
    target: &str,
    translator: &dyn Translator,
    timeout: Duration,
) -> Result<String> {
    let name = entity_name(&span.label);
    let translation = tokio::time::timeout(timeout, translator.translate(&name, target))
        .await
        .map_err(|_| LocaleError::Timeout(timeout.as_millis()))??;

    let label = format_label(&translation)?;
    Ok(format!("[{}_{}]", label, span.index))
}

/// Rewrite the labels of all placeholders in `text` into `target`
pub async fn localize_placeholders(
    text: &str,
    target: &str,
    translator: &dyn Translator,
    timeout: Duration,
) -> LocalizedText {
    let spans = find_placeholders(text);
    if spans.is_empty() {
        return LocalizedText {
            text: text.to_string(),
            ..Default::default()
        };
    }

    let results = join_all(
        spans
            .iter()
            .map(|span| translate_occurrence(span, target, translator, timeout)),
    )
    .await;

    let canonical: HashSet<&str> = spans.iter().map(|s| s.token.as_str()).collect();
    let mut localized = LocalizedText::default();
    let mut cursor = 0;

    // `join_all` yields results in the order the futures were given
    for (span, result) in spans.iter().zip(results) {
        localized.text.push_str(&text[cursor..span.start]);
        cursor = span.end;

        let result = result.and_then(|token| {
            let taken = token != span.token
                && (canonical.contains(token.as_str())
                    || localized.aliases.get(&token).is_some_and(|c| c != &span.token));
            if taken {
                Err(LocaleError::LabelCollision(token))
            } else {
                Ok(token)
            }
        });

        match result {
            Ok(token) => {
                if token != span.token {
                    localized.aliases.insert(token.clone(), span.token.clone());
                }
                localized.translated += 1;
                localized.text.push_str(&token);
            }
            Err(e) => {
                warn!(label = %span.label, translator = translator.name(), "keeping canonical label: {}", e);
                localized.failed += 1;
                localized.text.push_str(&span.token);
            }
        }
    }
    localized.text.push_str(&text[cursor..]);

    debug!(
        target_language = target,
        translated = localized.translated,
        failed = localized.failed,
        "placeholders localized"
    );
    localized
}
