use std::io::Read;

use tar::EntryType;

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::extract::Unpacker;

/// Stream every record of a tar archive through `unpacker`.
///
/// Record kinds other than directories, regular files, symlinks and hard
/// links (devices, fifos, global pax headers) are skipped.
pub(crate) fn unpack<R: Read>(reader: R, unpacker: &mut Unpacker) -> Result<()> {
    let mut archive = tar::Archive::new(reader);

    for record in archive.entries().map_err(Error::Corrupted)? {
        let mut record = record.map_err(Error::Corrupted)?;
        let name = String::from_utf8_lossy(&record.path_bytes()).into_owned();
        let entry_type = record.header().entry_type();

        let entry = match entry_type {
            EntryType::Directory => Entry::directory(name),
            EntryType::Regular | EntryType::Continuous => {
                Entry::file(name, record.size(), record.header().mode().ok())
            }
            EntryType::Symlink => {
                let target = link_target(&record, &name)?;
                Entry::symlink(name, target)
            }
            EntryType::Link => {
                let target = link_target(&record, &name)?;
                Entry::hard_link(name, target)
            }
            other => {
                tracing::debug!(entry = %name, entry_type = ?other, "skipping unsupported tar record");
                continue;
            }
        };

        unpacker.unpack(&entry, &mut record)?;
    }

    Ok(())
}

fn link_target<R: Read>(record: &tar::Entry<'_, R>, name: &str) -> Result<String> {
    match record.link_name_bytes() {
        Some(target) if !target.is_empty() => Ok(String::from_utf8_lossy(&target).into_owned()),
        _ => Err(Error::InvalidEntry {
            entry:  name.to_owned(),
            reason: "link has no target",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractOptions;
    use std::io::Cursor;

    fn header(entry_type: EntryType, size: u64) -> tar::Header {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_size(size);
        header.set_mode(0o644);
        header
    }

    fn run(data: Vec<u8>, root: &std::path::Path, options: ExtractOptions) -> Result<crate::Extracted> {
        let mut unpacker = Unpacker::new(root, &options);
        unpack(Cursor::new(data), &mut unpacker)?;
        unpacker.finish()
    }

    #[test]
    fn fifo_records_are_skipped() {
        let mut builder = tar::Builder::new(Vec::new());
        builder
            .append_data(&mut header(EntryType::Fifo, 0), "pipe", std::io::empty())
            .unwrap();
        builder
            .append_data(&mut header(EntryType::Regular, 2), "kept.txt", &b"ok"[..])
            .unwrap();
        let data = builder.into_inner().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let extracted = run(data, dir.path(), ExtractOptions::default()).unwrap();

        assert_eq!(extracted.entries, 1);
        assert!(!dir.path().join("pipe").exists());
        assert_eq!(std::fs::read(dir.path().join("kept.txt")).unwrap(), b"ok");
    }

    #[test]
    fn empty_stream_extracts_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let extracted = run(Vec::new(), dir.path(), ExtractOptions::default()).unwrap();
        assert_eq!(extracted, crate::Extracted::default());
    }

    #[test]
    fn garbage_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(vec![0xAB; 1024], dir.path(), ExtractOptions::default());
        assert!(matches!(result, Err(Error::Corrupted(_))));
    }

    #[test]
    fn hard_link_without_target_is_invalid() {
        let mut builder = tar::Builder::new(Vec::new());
        builder
            .append_data(&mut header(EntryType::Link, 0), "link", std::io::empty())
            .unwrap();
        let data = builder.into_inner().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let result = run(data, dir.path(), ExtractOptions::default());
        assert!(matches!(result, Err(Error::InvalidEntry { .. })));
    }
}
