use crate::HashAlgorithm;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("hash mismatch: expected {expected}, got {actual}")]
    Mismatch {
        algorithm: HashAlgorithm,
        expected:  String,
        actual:    String,
    },

    #[error("hash must be prefixed with the algorithm name followed by a colon. example: sha256:{{value}}")]
    MissingPrefix,

    #[error("unsupported hash algorithm {name:?}. Supported algorithms: {supported}")]
    UnsupportedAlgorithm { name: String, supported: String },

    #[error("invalid {algorithm} hash: expected {expected} hex characters, got {actual}")]
    InvalidLength {
        algorithm: HashAlgorithm,
        expected:  usize,
        actual:    usize,
    },

    #[error("invalid {algorithm} hash: contains non-hex character '{character}'")]
    InvalidHex {
        algorithm: HashAlgorithm,
        character: char,
    },
}

pub type Result<T> = std::result::Result<T, VerificationError>;
