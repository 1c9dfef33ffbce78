use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Error, Result};

/// Number of leading bytes inspected by [`detect_from_reader`].
pub const MAGIC_LEN: usize = 262;

/// Archive formats recognized from file content.
///
/// `Gzip`, `Bzip2`, `Xz` and `Zstd` always mean a tar stream wrapped in
/// that compression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveType {
    Unknown,
    Zip,
    Tar,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

/// Compression layer around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl ArchiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// The compression wrapped around the tar stream, if any.
    pub fn compression(self) -> Option<Compression> {
        match self {
            Self::Gzip => Some(Compression::Gzip),
            Self::Bzip2 => Some(Compression::Bzip2),
            Self::Xz => Some(Compression::Xz),
            Self::Zstd => Some(Compression::Zstd),
            Self::Unknown | Self::Zip | Self::Tar => None,
        }
    }

    pub fn is_known(self) -> bool { self != Self::Unknown }
}

impl Compression {
    pub fn as_str(self) -> &'static str { ArchiveType::from(self).as_str() }
}

impl From<Compression> for ArchiveType {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Gzip => Self::Gzip,
            Compression::Bzip2 => Self::Bzip2,
            Compression::Xz => Self::Xz,
            Compression::Zstd => Self::Zstd,
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Classify a header prefix. The first matching signature wins.
///
/// The tar check needs the full [`MAGIC_LEN`] bytes, so short inputs can
/// only match the compressed and zip signatures.
pub fn detect_format(data: &[u8]) -> ArchiveType {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] => ArchiveType::Zip,
        [0x1F, 0x8B, ..] => ArchiveType::Gzip,
        [0x42, 0x5A, 0x68, ..] => ArchiveType::Bzip2,
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => ArchiveType::Xz,
        [0x28, 0xB5, 0x2F, 0xFD, ..] => ArchiveType::Zstd,
        _ if is_tar_header(data) => ArchiveType::Tar,
        _ => ArchiveType::Unknown,
    }
}

fn is_tar_header(data: &[u8]) -> bool { data.len() >= MAGIC_LEN && data[257..262] == *b"ustar" }

/// Read up to [`MAGIC_LEN`] bytes and classify them.
///
/// Hitting end of input early is not an error.
pub fn detect_from_reader<R: Read>(reader: R) -> io::Result<ArchiveType> {
    let mut header = Vec::with_capacity(MAGIC_LEN);
    reader.take(MAGIC_LEN as u64).read_to_end(&mut header)?;
    Ok(detect_format(&header))
}

/// Detect the archive type of the file at `path` from its content.
pub fn detect_file(path: impl AsRef<Path>) -> Result<ArchiveType> {
    let path = path.as_ref();
    let detect_error = |source| Error::Detect {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(detect_error)?;
    let archive_type = detect_from_reader(file).map_err(detect_error)?;
    tracing::debug!(path = %path.display(), %archive_type, "detected archive type");
    Ok(archive_type)
}
