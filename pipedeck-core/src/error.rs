use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Sequence is empty")]
    EmptyCollection,

    #[error("Sequence index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
