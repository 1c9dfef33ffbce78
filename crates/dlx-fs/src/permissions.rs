use crate::{Error, Result};
use std::path::Path;

/// File permission modes applied to extracted entries.
///
/// Archives may carry arbitrary mode bits. Extraction collapses them to a
/// small set so that setuid bits or world-writable modes never survive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionMode {
    /// Regular file.
    ///
    /// On Unix: `0o644` (rw-r--r--)
    /// On Windows: no-op
    #[default]
    ReadWrite,

    /// Executable file.
    ///
    /// On Unix: `0o755` (rwxr-xr-x)
    /// On Windows: no-op
    Executable,

    /// Directory.
    ///
    /// On Unix: `0o755` (rwxr-xr-x)
    /// On Windows: no-op
    Directory,
}

impl PermissionMode {
    /// Mode for a regular file given the bits recorded in the archive.
    ///
    /// Any execute bit (user, group or other) upgrades the file to
    /// [`PermissionMode::Executable`]; everything else is [`PermissionMode::ReadWrite`].
    pub fn for_entry(mode: Option<u32>) -> Self {
        match mode {
            Some(bits) if bits & 0o111 != 0 => Self::Executable,
            _ => Self::ReadWrite,
        }
    }

    pub fn to_unix_mode(self) -> u32 {
        match self {
            Self::ReadWrite => 0o644,
            Self::Executable => 0o755,
            Self::Directory => 0o755,
        }
    }

    pub fn is_executable(self) -> bool { self.to_unix_mode() & 0o111 != 0 }

    /// Apply the permission mode to a file or directory path.
    ///
    /// # Errors
    /// Returns [`Error::Write`] if the path does not exist or its mode cannot be set.
    pub fn apply_to_path(self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(self.to_unix_mode());
            std::fs::set_permissions(path, perms).map_err(|e| Error::Write {
                path:   path.to_path_buf(),
                source: e,
            })?;
        }

        #[cfg(not(unix))]
        {
            let _ = (self, path);
        }

        Ok(())
    }
}
