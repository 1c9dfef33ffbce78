use std::io;
use std::path::PathBuf;

use crate::format::{ArchiveType, Compression};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read archive header of '{path}': {source}")]
    Detect { path: PathBuf, source: io::Error },

    #[error("unsupported archive type: {0}")]
    UnsupportedFormat(ArchiveType),

    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to create {codec} reader: {source}")]
    Decompress { codec: Compression, source: io::Error },

    #[error("archive read error: {0}")]
    Corrupted(#[source] io::Error),

    #[error("zip read error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid entry '{entry}': {reason}")]
    InvalidEntry { entry: String, reason: &'static str },

    #[error("path traversal detected: '{entry}' resolves to '{resolved}'")]
    PathTraversal { entry: String, resolved: PathBuf },

    #[error("symlink escape detected: '{entry}' -> '{target}'")]
    SymlinkEscape { entry: String, target: String },

    #[error("hard link escape detected: '{link}' -> '{target}'")]
    HardLinkEscape { link: PathBuf, target: PathBuf },

    #[error("hard link target not found: '{link}' -> '{target}'")]
    HardLinkTargetMissing { link: PathBuf, target: PathBuf },

    /// The cumulative size of extracted files went over
    /// [`ExtractOptions::max_bytes`](crate::ExtractOptions::max_bytes).
    ///
    /// Only the file being written when the limit was crossed is removed.
    /// Entries extracted before it stay on disk.
    #[error("extraction exceeded maximum size limit of {limit} bytes at '{entry}'")]
    SizeLimitExceeded { entry: String, limit: u64 },

    #[error("symlink target of '{entry}' exceeds {limit} bytes")]
    SymlinkTargetTooLong { entry: String, limit: usize },

    #[error("failed to write '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to resolve destination directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error(transparent)]
    Fs(#[from] dlx_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
