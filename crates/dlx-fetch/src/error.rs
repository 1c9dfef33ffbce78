//! Error types for dlx-fetch.

use std::io;
use std::path::PathBuf;

use dlx_verify::VerificationError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] BoxError),

    #[error("error fetching URL: {0}")]
    Network(#[source] BoxError),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("download exceeded maximum size limit of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error(transparent)]
    Checksum(#[from] VerificationError),

    #[error("error creating output file {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("error writing to {target}: {source}")]
    Write { target: String, source: io::Error },

    #[error("error creating temp file: {0}")]
    TempFile(#[source] io::Error),
}

impl FetchError {
    pub(crate) fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self { Self::Network(Box::new(err)) }

    /// Errors after which the partially written output is deleted.
    pub fn discards_output(&self) -> bool { matches!(self, Self::TooLarge { .. } | Self::Checksum(_)) }
}

pub type Result<T> = std::result::Result<T, FetchError>;
