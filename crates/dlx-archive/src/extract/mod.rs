//! Archive extraction for zip and (compressed) tar.
//!
//! Both formats decode their records into [`Entry`] values and hand them to
//! one [`Unpacker`], which owns the destination root, the byte budget and
//! the deferred hard links.
//!
//! # Platform Behavior
//!
//! **Unix**: files are created `0644`, directories `0755`, and files with any
//! execute bit in the archive are set to `0755`.
//!
//! **Windows**: mode bits are ignored. Symlink creation needs the usual
//! developer-mode or administrator privilege.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use dlx_fs::PermissionMode;

use crate::entry::{Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format::ArchiveType;
use crate::options::ExtractOptions;
use crate::sanitize::{clean_path, is_path_safe, join_clean, strip_components};

mod tar;
mod zip;

/// Longest symlink target accepted from an archive, in bytes.
pub const MAX_SYMLINK_TARGET: usize = 4096;

/// Summary of a finished extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Directories, files and links materialized.
    pub entries: usize,
    /// Bytes written to regular files.
    pub bytes:   u64,
}

/// Extract `path` into the current working directory.
///
/// `archive_type` normally comes from [`detect_file`](crate::detect_file);
/// compressed variants are trusted to contain tar.
///
/// On error the extraction stops at the failing entry. Whatever was written
/// before it stays on disk.
pub fn extract(
    path: impl AsRef<Path>,
    archive_type: ArchiveType,
    options: &ExtractOptions,
) -> Result<Extracted> {
    let root = std::env::current_dir().map_err(Error::CurrentDir)?;
    extract_to(path, archive_type, root, options)
}

/// Extract `path` into `destination`, creating it if needed.
pub fn extract_to(
    path: impl AsRef<Path>,
    archive_type: ArchiveType,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<Extracted> {
    let path = path.as_ref();
    if !archive_type.is_known() {
        return Err(Error::UnsupportedFormat(archive_type));
    }

    let destination = destination.as_ref();
    dlx_fs::create_dir_all(destination)?;
    let root = std::path::absolute(destination).map_err(Error::CurrentDir)?;

    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        archive = %path.display(),
        destination = %root.display(),
        %archive_type,
        "extracting archive"
    );

    let mut unpacker = Unpacker::new(root, options);
    if archive_type == ArchiveType::Zip {
        self::zip::unpack(BufReader::new(file), &mut unpacker)?;
    } else if let Some(compression) = archive_type.compression() {
        self::tar::unpack(compression.open(file)?, &mut unpacker)?;
    } else {
        self::tar::unpack(BufReader::new(file), &mut unpacker)?;
    }

    let extracted = unpacker.finish()?;
    tracing::info!(entries = extracted.entries, bytes = extracted.bytes, "extraction complete");
    Ok(extracted)
}

/// A hard link whose target had not been extracted yet when the link was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingHardLink {
    pub(crate) link:   PathBuf,
    pub(crate) target: PathBuf,
}

/// Materializes entries below one destination root.
pub(crate) struct Unpacker {
    root:    PathBuf,
    options: ExtractOptions,
    written: u64,
    entries: usize,
    pending: Vec<PendingHardLink>,
}

impl Unpacker {
    pub(crate) fn new(root: impl AsRef<Path>, options: &ExtractOptions) -> Self {
        Self {
            root:    clean_path(root.as_ref()),
            options: *options,
            written: 0,
            entries: 0,
            pending: Vec::new(),
        }
    }

    /// Write one entry. `reader` yields the content of regular files and is
    /// ignored for every other kind.
    pub(crate) fn unpack<R: Read>(&mut self, entry: &Entry, reader: &mut R) -> Result<()> {
        let Some(path) = self.destination(&entry.name)? else {
            tracing::debug!(entry = %entry.name, "skipping stripped entry");
            return Ok(());
        };

        match &entry.kind {
            EntryKind::Directory => self.directory(&path),
            EntryKind::File => self.file(entry, &path, reader),
            EntryKind::Symlink { target } => self.symlink(entry, &path, target),
            EntryKind::HardLink { target } => self.hard_link(entry, &path, target),
        }
    }

    /// Create the hard links deferred during the pass and return the summary.
    pub(crate) fn finish(mut self) -> Result<Extracted> {
        for PendingHardLink { link, target } in std::mem::take(&mut self.pending) {
            if !is_path_safe(&link, &self.root)
                || !is_path_safe(&target, &self.root)
                || self.symlinked_ancestor(&link)?.is_some()
                || self.symlinked_ancestor(&target)?.is_some()
            {
                return Err(Error::HardLinkEscape { link, target });
            }
            dlx_fs::create_parent(&link)?;
            if !dlx_fs::exists(&target)? {
                return Err(Error::HardLinkTargetMissing { link, target });
            }
            dlx_fs::hard_link(&target, &link)?;
            tracing::debug!(link = %link.display(), target = %target.display(), "resolved deferred hard link");
            self.entries += 1;
        }

        Ok(Extracted {
            entries: self.entries,
            bytes:   self.written,
        })
    }

    fn destination(&self, name: &str) -> Result<Option<PathBuf>> {
        let Some(stripped) = strip_components(name, self.options.strip_components) else {
            return Ok(None);
        };

        let resolved = join_clean(&self.root, &stripped);
        if !is_path_safe(&resolved, &self.root) {
            return Err(Error::PathTraversal {
                entry: name.to_owned(),
                resolved,
            });
        }
        if let Some(link) = self.symlinked_ancestor(&resolved)? {
            tracing::debug!(entry = %name, link = %link.display(), "entry path runs through a symlink");
            return Err(Error::PathTraversal {
                entry: name.to_owned(),
                resolved,
            });
        }
        Ok(Some(resolved))
    }

    fn directory(&mut self, path: &Path) -> Result<()> {
        dlx_fs::create_dir_all(path)?;
        tracing::debug!(path = %path.display(), "created directory");
        self.entries += 1;
        Ok(())
    }

    fn file<R: Read>(&mut self, entry: &Entry, path: &Path, reader: &mut R) -> Result<()> {
        self.reject_root(entry, path)?;

        let remaining = self.options.limit().map(|limit| limit.saturating_sub(self.written));
        if remaining.is_some_and(|remaining| entry.size > remaining) {
            return Err(self.over_limit(entry));
        }

        dlx_fs::create_parent(path)?;
        if dlx_fs::is_symlink(path)? {
            dlx_fs::remove_file(path)?;
        }
        let mut out = dlx_fs::create_file(path)?;
        let copied = match remaining {
            // one byte past the budget is enough to detect an undersized header
            Some(remaining) => io::copy(&mut reader.by_ref().take(remaining.saturating_add(1)), &mut out),
            None => io::copy(reader, &mut out),
        };
        drop(out);

        let copied = copied.map_err(|source| Error::ExtractionFailed {
            path: path.to_path_buf(),
            source,
        })?;
        self.written += copied;

        if self.options.limit().is_some_and(|limit| self.written > limit) {
            self.discard(path);
            return Err(self.over_limit(entry));
        }

        let mode = PermissionMode::for_entry(entry.mode);
        if mode.is_executable() {
            mode.apply_to_path(path)?;
        }

        tracing::debug!(path = %path.display(), bytes = copied, "extracted file");
        self.entries += 1;
        Ok(())
    }

    fn symlink(&mut self, entry: &Entry, path: &Path, target: &str) -> Result<()> {
        self.reject_root(entry, path)?;

        if target.len() > MAX_SYMLINK_TARGET {
            return Err(Error::SymlinkTargetTooLong {
                entry: entry.name.clone(),
                limit: MAX_SYMLINK_TARGET,
            });
        }

        let absolute = Path::new(target).is_absolute();
        let target = if absolute {
            target.to_owned()
        } else {
            match strip_components(target, self.options.strip_components) {
                Some(stripped) => stripped,
                None => {
                    tracing::debug!(entry = %entry.name, %target, "skipping symlink with stripped target");
                    return Ok(());
                }
            }
        };

        let base = path.parent().unwrap_or(&self.root);
        let resolved = if absolute {
            clean_path(Path::new(&target))
        } else {
            join_clean(base, &target)
        };
        if !is_path_safe(&resolved, &self.root) || self.target_traverses_symlink(base, Path::new(&target))? {
            return Err(Error::SymlinkEscape {
                entry: entry.name.clone(),
                target,
            });
        }

        dlx_fs::create_parent(path)?;
        dlx_fs::replace_symlink(&target, path)?;
        tracing::debug!(path = %path.display(), %target, "created symlink");
        self.entries += 1;
        Ok(())
    }

    fn hard_link(&mut self, entry: &Entry, path: &Path, target: &str) -> Result<()> {
        self.reject_root(entry, path)?;

        let Some(stripped) = strip_components(target, self.options.strip_components) else {
            tracing::debug!(entry = %entry.name, %target, "skipping hard link with stripped target");
            return Ok(());
        };

        let target = join_clean(&self.root, &stripped);
        if !is_path_safe(&target, &self.root) || self.symlinked_ancestor(&target)?.is_some() {
            return Err(Error::HardLinkEscape {
                link: path.to_path_buf(),
                target,
            });
        }

        dlx_fs::create_parent(path)?;
        if dlx_fs::exists(&target)? {
            dlx_fs::hard_link(&target, path)?;
            tracing::debug!(path = %path.display(), target = %target.display(), "created hard link");
            self.entries += 1;
        } else {
            tracing::debug!(path = %path.display(), target = %target.display(), "deferring hard link");
            self.pending.push(PendingHardLink {
                link: path.to_path_buf(),
                target,
            });
        }
        Ok(())
    }

    /// First existing symlink strictly between the root and `path`.
    ///
    /// The lexical checks cannot see links the archive put on disk earlier;
    /// writing below one of them could land outside the root.
    fn symlinked_ancestor(&self, path: &Path) -> Result<Option<PathBuf>> {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return Ok(None);
        };

        let mut current = self.root.clone();
        let mut components = relative.components().peekable();
        while let Some(component) = components.next() {
            if components.peek().is_none() {
                break;
            }
            current.push(component);
            if dlx_fs::is_symlink(&current)? {
                return Ok(Some(current));
            }
        }
        Ok(None)
    }

    /// Whether the OS, resolving the literal `target` from `base`, would pass
    /// through an existing symlink below the root before the last component.
    ///
    /// Past such a link a following `..` no longer means what it does
    /// lexically.
    fn target_traverses_symlink(&self, base: &Path, target: &Path) -> Result<bool> {
        let mut current = if target.is_absolute() {
            PathBuf::new()
        } else {
            base.to_path_buf()
        };

        let mut components = target.components().peekable();
        while let Some(component) = components.next() {
            match component {
                Component::ParentDir => {
                    current.pop();
                }
                Component::CurDir => {}
                other => current.push(other),
            }

            let below_root = current != self.root && is_path_safe(&current, &self.root);
            if components.peek().is_some() && below_root && dlx_fs::is_symlink(&current)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Only directories may resolve to the root itself.
    fn reject_root(&self, entry: &Entry, path: &Path) -> Result<()> {
        if path == self.root {
            return Err(Error::InvalidEntry {
                entry:  entry.name.clone(),
                reason: "resolves to the destination directory",
            });
        }
        Ok(())
    }

    fn over_limit(&self, entry: &Entry) -> Error {
        Error::SizeLimitExceeded {
            entry: entry.name.clone(),
            limit: self.options.max_bytes,
        }
    }

    fn discard(&self, path: &Path) {
        if let Err(err) = dlx_fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove oversized file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, empty};

    fn unpacker(root: &Path, options: ExtractOptions) -> Unpacker { Unpacker::new(root, &options) }

    fn file(unpacker: &mut Unpacker, name: &str, content: &[u8]) -> Result<()> {
        let entry = Entry::file(name, content.len() as u64, Some(0o644));
        unpacker.unpack(&entry, &mut Cursor::new(content))
    }

    #[test]
    fn budget_is_cumulative() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default().max_bytes(10));

        file(&mut unpacker, "a", b"123456").unwrap();
        let err = file(&mut unpacker, "b", b"12345").unwrap_err();

        assert!(matches!(err, Error::SizeLimitExceeded { limit: 10, .. }));
        assert!(dir.path().join("a").exists());
        assert!(!dir.path().join("b").exists());
    }

    #[test]
    fn budget_allows_exact_fit() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default().max_bytes(10));

        file(&mut unpacker, "a", b"12345").unwrap();
        file(&mut unpacker, "b", b"12345").unwrap();

        assert_eq!(unpacker.finish().unwrap(), Extracted { entries: 2, bytes: 10 });
    }

    #[test]
    fn understated_size_is_caught_after_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default().max_bytes(100));

        let entry = Entry::file("liar", 10, None);
        let content = vec![7u8; 150];
        let err = unpacker.unpack(&entry, &mut Cursor::new(content)).unwrap_err();

        assert!(matches!(err, Error::SizeLimitExceeded { .. }));
        assert!(!dir.path().join("liar").exists());
    }

    #[test]
    fn file_at_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default());

        let err = file(&mut unpacker, "sub/..", b"x").unwrap_err();
        assert!(matches!(err, Error::InvalidEntry { .. }));
    }

    #[test]
    fn long_symlink_target_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default());

        let entry = Entry::symlink("link", "a/".repeat(MAX_SYMLINK_TARGET / 2 + 1));
        let err = unpacker.unpack(&entry, &mut empty()).unwrap_err();
        assert!(matches!(err, Error::SymlinkTargetTooLong { limit: MAX_SYMLINK_TARGET, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn absolute_symlink_outside_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default());

        let err = unpacker
            .unpack(&Entry::symlink("passwd", "/etc/passwd"), &mut empty())
            .unwrap_err();
        assert!(matches!(err, Error::SymlinkEscape { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn absolute_symlink_inside_root_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let root = clean_path(&std::path::absolute(dir.path()).unwrap());
        let mut unpacker = unpacker(&root, ExtractOptions::default());

        let target = root.join("data.txt");
        let entry = Entry::symlink("link", target.to_string_lossy());
        unpacker.unpack(&entry, &mut empty()).unwrap();

        assert_eq!(std::fs::read_link(root.join("link")).unwrap(), target);
    }

    #[test]
    fn missing_deferred_target_fails_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default());

        unpacker.unpack(&Entry::hard_link("link", "never"), &mut empty()).unwrap();
        let err = unpacker.finish().unwrap_err();
        assert!(matches!(err, Error::HardLinkTargetMissing { .. }));
    }

    #[test]
    fn hard_link_escape_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut unpacker = unpacker(dir.path(), ExtractOptions::default());

        let err = unpacker
            .unpack(&Entry::hard_link("link", "../outside"), &mut empty())
            .unwrap_err();
        assert!(matches!(err, Error::HardLinkEscape { .. }));
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("archive");
        std::fs::write(&archive, b"plain text").unwrap();

        let result = extract_to(&archive, ArchiveType::Unknown, dir.path().join("out"), &ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedFormat(ArchiveType::Unknown))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn missing_archive_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_to(dir.path().join("missing.tar"), ArchiveType::Tar, dir.path(), &ExtractOptions::default());
        assert!(matches!(result, Err(Error::Open { .. })));
    }
}
