use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to stat '{path}': {source}")]
    Metadata { path: PathBuf, source: io::Error },

    #[error("failed to hard link '{link}' to '{target}': {source}")]
    HardLink {
        target: PathBuf,
        link:   PathBuf,
        source: io::Error,
    },

    #[error("failed to create symlink '{link}' -> '{target}': {source}")]
    Symlink {
        target: PathBuf,
        link:   PathBuf,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
