use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VerificationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [Self; 2] = [Self::Sha256, Self::Sha512];

    /// Lowercase name used in `algo:hex` strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Human-facing name, e.g. `SHA-256`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Length of the hex-encoded digest.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }

    fn from_name(name: &str) -> Option<Self> { Self::ALL.into_iter().find(|algo| algo.name() == name) }

    fn supported() -> String { Self::ALL.map(Self::name).join(", ") }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// A digest the downloaded content must match, parsed from `algo:hex`.
///
/// ```
/// use dlx_verify::{ExpectedHash, HashAlgorithm};
///
/// let expected: ExpectedHash =
///     "SHA256:E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855".parse()?;
/// assert_eq!(expected.algorithm(), HashAlgorithm::Sha256);
/// expected.verify("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")?;
/// # Ok::<(), dlx_verify::VerificationError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedHash {
    algorithm: HashAlgorithm,
    digest:    String,
}

impl ExpectedHash {
    pub fn algorithm(&self) -> HashAlgorithm { self.algorithm }

    /// Lowercase hex digest without the algorithm prefix.
    pub fn digest(&self) -> &str { &self.digest }

    /// Compare against a computed hex digest.
    pub fn verify(&self, actual_hex: &str) -> Result<()> {
        if actual_hex.eq_ignore_ascii_case(&self.digest) {
            Ok(())
        } else {
            Err(VerificationError::Mismatch {
                algorithm: self.algorithm,
                expected:  self.digest.clone(),
                actual:    actual_hex.to_ascii_lowercase(),
            })
        }
    }
}

impl FromStr for ExpectedHash {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, digest) = s.split_once(':').ok_or(VerificationError::MissingPrefix)?;
        let name = name.to_ascii_lowercase();
        let digest = digest.to_ascii_lowercase();

        let algorithm = HashAlgorithm::from_name(&name).ok_or_else(|| VerificationError::UnsupportedAlgorithm {
            name,
            supported: HashAlgorithm::supported(),
        })?;

        if digest.len() != algorithm.hex_len() {
            return Err(VerificationError::InvalidLength {
                algorithm,
                expected: algorithm.hex_len(),
                actual: digest.len(),
            });
        }

        if let Some(character) = digest.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(VerificationError::InvalidHex { algorithm, character });
        }

        Ok(Self { algorithm, digest })
    }
}

impl fmt::Display for ExpectedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}:{}", self.algorithm, self.digest) }
}
