//! Content verification for downloaded artifacts.
//!
//! [`ExpectedHash`] parses the user-supplied `algo:hex` string and
//! [`StreamHasher`] computes the matching digest incrementally while bytes
//! stream to disk, so the content is read only once.

pub use self::error::{Result, VerificationError};
pub use self::expected::{ExpectedHash, HashAlgorithm};
pub use self::hasher::{Hasher, Sha256Hasher, Sha512Hasher, StreamHasher};

mod error;
mod expected;
mod hasher;
