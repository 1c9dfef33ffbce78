#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use dlx_archive::ArchiveType;
use tar::{EntryType, Header};
use zip::write::SimpleFileOptions;

/// Tar archive built in memory.
///
/// Names are written straight into the header so that hostile names such as
/// `../../etc/passwd` survive; `tar::Builder` would refuse them.
pub struct TarFixture {
    builder: tar::Builder<Vec<u8>>,
}

impl TarFixture {
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    pub fn dir(self, name: &str) -> Self { self.append(EntryType::Directory, name, None, 0o755, &[]) }

    pub fn file(self, name: &str, content: &[u8]) -> Self { self.file_with_mode(name, content, 0o644) }

    pub fn file_with_mode(self, name: &str, content: &[u8], mode: u32) -> Self {
        self.append(EntryType::Regular, name, None, mode, content)
    }

    pub fn symlink(self, name: &str, target: &str) -> Self {
        self.append(EntryType::Symlink, name, Some(target), 0o777, &[])
    }

    pub fn hard_link(self, name: &str, target: &str) -> Self {
        self.append(EntryType::Link, name, Some(target), 0o644, &[])
    }

    pub fn finish(self) -> Vec<u8> { self.builder.into_inner().expect("finish tar") }

    fn append(mut self, entry_type: EntryType, name: &str, link: Option<&str>, mode: u32, content: &[u8]) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_size(content.len() as u64);
        header.set_mode(mode);
        header.set_mtime(0);

        let old = header.as_old_mut();
        old.name[..name.len()].copy_from_slice(name.as_bytes());
        if let Some(link) = link {
            old.linkname[..link.len()].copy_from_slice(link.as_bytes());
        }
        header.set_cksum();

        self.builder.append(&header, content).expect("append tar entry");
        self
    }
}

/// Zip archive built in memory.
pub struct ZipFixture {
    writer: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipFixture {
    pub fn new() -> Self {
        Self {
            writer: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    pub fn dir(mut self, name: &str) -> Self {
        self.writer.add_directory(name, SimpleFileOptions::default()).expect("add directory");
        self
    }

    pub fn file(self, name: &str, content: &[u8]) -> Self { self.file_with_mode(name, content, 0o644) }

    pub fn file_with_mode(mut self, name: &str, content: &[u8], mode: u32) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(mode);
        self.writer.start_file(name, options).expect("start file");
        self.writer.write_all(content).expect("write file");
        self
    }

    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.writer
            .add_symlink(name, target, SimpleFileOptions::default())
            .expect("add symlink");
        self
    }

    pub fn finish(self) -> Vec<u8> { self.writer.finish().expect("finish zip").into_inner() }
}

/// Wrap a tar stream in the compression named by `archive_type`.
pub fn compress(tar: Vec<u8>, archive_type: ArchiveType) -> Vec<u8> {
    match archive_type {
        ArchiveType::Tar => tar,
        ArchiveType::Gzip => {
            let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&tar).expect("gzip");
            encoder.finish().expect("gzip")
        }
        #[cfg(feature = "bzip2")]
        ArchiveType::Bzip2 => {
            let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(&tar).expect("bzip2");
            encoder.finish().expect("bzip2")
        }
        #[cfg(feature = "xz")]
        ArchiveType::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(&tar).expect("xz");
            encoder.finish().expect("xz")
        }
        #[cfg(feature = "zstd")]
        ArchiveType::Zstd => zstd::encode_all(&tar[..], 3).expect("zstd"),
        other => panic!("cannot compress tar as {other}"),
    }
}

/// Write `data` to a file without an extension, so only content tells its type.
pub fn write_archive(dir: &Path, data: &[u8]) -> PathBuf {
    let path = dir.join("download");
    std::fs::write(&path, data).expect("write archive");
    path
}

#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).expect("metadata").permissions().mode() & 0o777
}
