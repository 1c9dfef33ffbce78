//! Archive extraction with content-based format detection.
//!
//! # Architecture
//!
//! - `format.rs` - Magic-byte detection
//! - `codec.rs` - Decompression front-ends for tar
//! - `sanitize.rs` - Path stripping and containment checks
//! - `extract/` - Tar and zip unpackers behind one façade
//!
//! Every extracted path is checked to stay inside the destination, symlink
//! and hard link targets included, and the total bytes written are capped
//! by [`ExtractOptions::max_bytes`].
//!
//! ```no_run
//! use dlx_archive::{ExtractOptions, detect_file, extract};
//!
//! let archive_type = detect_file("release.tar.gz")?;
//! let options = ExtractOptions::default().strip_components(1);
//! extract("release.tar.gz", archive_type, &options)?;
//! # Ok::<(), dlx_archive::Error>(())
//! ```

pub use codec::Decoder;
pub use entry::{Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{Extracted, MAX_SYMLINK_TARGET, extract, extract_to};
pub use format::{ArchiveType, Compression, MAGIC_LEN, detect_file, detect_format, detect_from_reader};
pub use options::ExtractOptions;
pub use sanitize::{clean_path, is_path_safe, join_clean, strip_components};

mod codec;
pub mod entry;
mod error;
pub mod extract;
mod format;
pub mod options;
mod sanitize;
