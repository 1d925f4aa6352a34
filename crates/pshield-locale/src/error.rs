use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("No translation of '{label}' into '{language}'")]
    Unsupported { label: String, language: String },

    #[error("Translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Translation service returned status {0}")]
    Status(u16),

    #[error("Translation timed out after {0} ms")]
    Timeout(u128),

    #[error("Localized placeholder {0} is already taken")]
    LabelCollision(String),

    #[error("Unusable translation: {0:?}")]
    InvalidTranslation(String),
}

pub type Result<T> = std::result::Result<T, LocaleError>;
