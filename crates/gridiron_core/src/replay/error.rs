use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Invalid replay: {0}")]
    Invalid(String),
}

impl ReplayError {
    /// Whether retrying (or skipping the offending record) can make sense.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ReplayError::Io(_) => true,
            ReplayError::Json { .. } => true,
            ReplayError::Encode(_) => false,
            ReplayError::Decode(_) => false,
            ReplayError::Decompression => false,
            ReplayError::ChecksumMismatch => false,
            ReplayError::VersionMismatch { .. } => false,
            ReplayError::Invalid(_) => false,
        }
    }
}
