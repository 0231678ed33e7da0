//! Error types for the shared media library.
//!
//! The index itself never fails: missing knowledge is reported as `None`.
//! These errors only come from the outer surfaces (scripts, config, CLI input).

use thiserror::Error;

/// All errors that can occur at the edges of the shared media library.
#[derive(Error, Debug)]
pub enum MediaError {
    /// A range that is inverted or extends past the history sentinels.
    #[error("Invalid message range [{from}, {till}]")]
    InvalidRange { from: i64, till: i64 },

    /// A script message id outside `[HISTORY_START, HISTORY_END]`.
    #[error("Message id {id} on script line {line} is outside the history range")]
    InvalidMessageId { line: usize, id: i64 },

    /// Media type name not recognized.
    #[error("Unknown shared media type: {0}")]
    UnknownType(String),

    /// Media type index outside the known set.
    #[error("Shared media type index out of range: {0}")]
    InvalidTypeIndex(u8),

    /// A script line could not be decoded.
    #[error("Malformed script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Config serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for shared media operations.
pub type MediaResult<T> = Result<T, MediaError>;
