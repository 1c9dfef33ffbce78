//! Filesystem primitives used while materializing archive entries.
//!
//! Every function maps `io::Error` into an [`Error`] variant carrying the
//! path(s) involved, so callers can report which entry failed.

mod error;
pub mod permissions;

pub use error::{Error, Result};
pub use permissions::PermissionMode;

use std::fs::File;
use std::io;
use std::path::Path;

/// Create a directory and all missing parents.
///
/// Succeeds when the directory already exists. New directories get
/// [`PermissionMode::Directory`] on Unix.
pub fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PermissionMode::Directory.to_unix_mode());
    }

    builder.create(path).map_err(|e| Error::CreateDir {
        path:   path.to_path_buf(),
        source: e,
    })
}

/// Create `path`'s parent directory if it has one.
pub fn create_parent(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Open `path` for writing, truncating any existing content.
///
/// New files get [`PermissionMode::ReadWrite`] on Unix.
pub fn create_file(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PermissionMode::ReadWrite.to_unix_mode());
    }

    options.open(path).map_err(|e| Error::Write {
        path:   path.to_path_buf(),
        source: e,
    })
}

pub fn remove_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::remove_file(path).map_err(|e| Error::Remove {
        path:   path.to_path_buf(),
        source: e,
    })
}

/// Whether anything (file, directory or dangling symlink) exists at `path`.
///
/// Links are not followed. A missing path is `Ok(false)`; any other stat
/// failure is an error.
pub fn exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Metadata {
            path:   path.to_path_buf(),
            source: e,
        }),
    }
}

/// Whether `path` itself is a symlink. A missing path is `Ok(false)`.
pub fn is_symlink(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match std::fs::symlink_metadata(path) {
        Ok(meta) => Ok(meta.file_type().is_symlink()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Metadata {
            path:   path.to_path_buf(),
            source: e,
        }),
    }
}

/// Create a hard link at `link` pointing to the existing file `target`.
pub fn hard_link(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let target = target.as_ref();
    let link = link.as_ref();
    std::fs::hard_link(target, link).map_err(|e| Error::HardLink {
        target: target.to_path_buf(),
        link:   link.to_path_buf(),
        source: e,
    })
}

/// Create a symlink at `link` with the literal text `target`, replacing
/// whatever currently occupies `link`.
///
/// An existing non-empty directory at `link` is not removed and makes the
/// call fail.
pub fn replace_symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let target = target.as_ref();
    let link = link.as_ref();

    match std::fs::symlink_metadata(link) {
        Ok(meta) => {
            let removed = if meta.is_dir() {
                std::fs::remove_dir(link)
            } else {
                std::fs::remove_file(link)
            };
            removed.map_err(|e| Error::Remove {
                path:   link.to_path_buf(),
                source: e,
            })?;
            tracing::trace!(link = %link.display(), "replaced existing entry");
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(Error::Metadata {
                path:   link.to_path_buf(),
                source: e,
            });
        }
    }

    symlink(target, link).map_err(|e| Error::Symlink {
        target: target.to_path_buf(),
        link:   link.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> { std::os::unix::fs::symlink(target, link) }

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = link.parent().map(|p| p.join(target)).unwrap_or_else(|| target.to_path_buf());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
