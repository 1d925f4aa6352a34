//! Locale adapter: language identification and placeholder label translation

pub mod error;
pub mod identify;
pub mod localize;
pub mod translate;

pub use error::{LocaleError, Result};
pub use identify::{FixedLanguage, LanguageIdentifier, MIN_DETECT_CHARS, WhatlangIdentifier};
pub use localize::{LocalizedText, format_label, localize_placeholders};
pub use translate::{DictionaryTranslator, HttpTranslator, SOURCE_LANGUAGE, Translator};

/// Baseline language of placeholder labels
pub const DEFAULT_LANGUAGE: &str = "en";
