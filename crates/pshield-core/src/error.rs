use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid entity type: {0:?}")]
    InvalidEntityType(String),

    #[error("Invalid placeholder: {0:?}")]
    InvalidPlaceholder(String),

    #[error("Invalid rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("Invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
