//! Error types

use thiserror::Error;

/// Lexicon loading / compilation failures
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Invalid keyword pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Lexicon file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lexicon file malformed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Lexicon has no categories")]
    NoCategories,
}

/// Remote chat backend failures. All of these are recovered locally.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Remote backend disabled")]
    Disabled,

    #[error("Remote transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote backend returned status {0}")]
    Status(u16),

    #[error("Remote response malformed: {0}")]
    Decode(String),
}

/// Engine / session level errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Empty utterance")]
    EmptyUtterance,

    #[error("Unknown menu: {0}")]
    UnknownMenu(String),

    #[error("Event log storage error: {0}")]
    LogStorage(#[from] std::io::Error),

    #[error("Event log serialization error: {0}")]
    LogSerialize(#[from] serde_json::Error),

    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
