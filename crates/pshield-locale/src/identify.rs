//! Language identification

use whatlang::Lang;

/// Inputs shorter than this (in characters) are not classified
pub const MIN_DETECT_CHARS: usize = 20;

pub trait LanguageIdentifier: Send + Sync {
    /// ISO 639-1 code of the dominant language, or `None` if unsure
    fn identify(&self, text: &str) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct WhatlangIdentifier {
    min_chars: usize,
}

impl WhatlangIdentifier {
    pub fn new() -> Self {
        Self {
            min_chars: MIN_DETECT_CHARS,
        }
    }

    pub fn with_min_chars(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl Default for WhatlangIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageIdentifier for WhatlangIdentifier {
    fn identify(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.chars().count() < self.min_chars {
            return None;
        }

        let info = whatlang::detect(text)?;
        if !info.is_reliable() {
            return None;
        }
        lang_to_code(info.lang()).map(str::to_string)
    }
}

/// Always reports the same language; for callers that already know it
#[derive(Debug, Clone)]
pub struct FixedLanguage(pub String);

impl LanguageIdentifier for FixedLanguage {
    fn identify(&self, _text: &str) -> Option<String> {
        Some(self.0.clone())
    }
}

fn lang_to_code(lang: Lang) -> Option<&'static str> {
    use whatlang::Lang::*;
    let code = match lang {
        Eng => "en",
        Fra => "fr",
        Deu => "de",
        Spa => "es",
        Pol => "pl",
        Ita => "it",
        Por => "pt",
        Nld => "nl",
        Rus => "ru",
        Ukr => "uk",
        Ces => "cs",
        Slk => "sk",
        Swe => "sv",
        Dan => "da",
        Nob => "nb",
        Fin => "fi",
        Hun => "hu",
        Ron => "ro",
        Tur => "tr",
        Ell => "el",
        Cmn => "zh",
        Jpn => "ja",
        Kor => "ko",
        Ara => "ar",
        Heb => "he",
        Hin => "hi",
        _ => return None,
    };
    Some(code)
}
