/// One archive record, decoded from its format-specific header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Name as stored in the archive, before stripping.
    pub name: String,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// `target` is the literal link text.
    Symlink { target: String },
    /// `target` names another entry of the same archive.
    HardLink { target: String },
}

impl Entry {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: None,
            kind: EntryKind::Directory,
        }
    }

    pub fn file(name: impl Into<String>, size: u64, mode: Option<u32>) -> Self {
        Self {
            name: name.into(),
            size,
            mode,
            kind: EntryKind::File,
        }
    }

    pub fn symlink(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: None,
            kind: EntryKind::Symlink {
                target: target.into(),
            },
        }
    }

    pub fn hard_link(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: None,
            kind: EntryKind::HardLink {
                target: target.into(),
            },
        }
    }
}
