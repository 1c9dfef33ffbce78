use std::io::{Read, Seek};

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::extract::{MAX_SYMLINK_TARGET, Unpacker};

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Walk the central directory in order and hand each entry to `unpacker`.
///
/// Symlinks are entries whose Unix mode has the link type; their content
/// is the target text. Zip has no hard links.
pub(crate) fn unpack<R: Read + Seek>(reader: R, unpacker: &mut Unpacker) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)?;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let name = file.name().to_owned();
        let mode = file.unix_mode();

        let entry = if file.is_dir() {
            Entry::directory(name)
        } else if mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
            let target = read_link_target(&mut file, &name)?;
            Entry::symlink(name, target)
        } else {
            Entry::file(name, file.size(), mode)
        };

        unpacker.unpack(&entry, &mut file)?;
    }

    Ok(())
}

fn read_link_target<R: Read>(file: &mut R, name: &str) -> Result<String> {
    let mut target = Vec::new();
    file.take(MAX_SYMLINK_TARGET as u64 + 1)
        .read_to_end(&mut target)
        .map_err(Error::Corrupted)?;

    if target.len() > MAX_SYMLINK_TARGET {
        return Err(Error::SymlinkTargetTooLong {
            entry: name.to_owned(),
            limit: MAX_SYMLINK_TARGET,
        });
    }

    String::from_utf8(target).map_err(|_| Error::InvalidEntry {
        entry:  name.to_owned(),
        reason: "symlink target is not valid UTF-8",
    })
}
