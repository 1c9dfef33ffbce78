use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dlx_verify::ExpectedHash;

use super::progress::Progress;

/// Phases of a download, reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Request sent, waiting for the response head.
    #[default]
    Connecting,

    /// Streaming the body to the output.
    Downloading,

    /// Comparing the computed digest with the expected one.
    ///
    /// Only reported when a digest was supplied.
    Verifying,

    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Verifying => write!(f, "Verifying"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Per-download options.
///
/// # Examples
///
/// ```
/// use dlx_fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .max_bytes(4 << 30)
///     .expected("sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".parse()?);
/// assert_eq!(options.max_bytes, Some(4 << 30));
/// # Ok::<(), dlx_verify::VerificationError>(())
/// ```
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Body size ceiling. `None` downloads without a limit.
    pub max_bytes: Option<u64>,

    /// Digest the body must match.
    pub expected: Option<ExpectedHash>,

    pub on_progress: Option<ProgressCallback>,
}

impl FetchOptions {
    /// Set the size ceiling; zero means unlimited.
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = (max_bytes > 0).then_some(max_bytes);
        self
    }

    pub fn expected(mut self, expected: ExpectedHash) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("max_bytes", &self.max_bytes)
            .field("expected", &self.expected)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Where the downloaded body goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
}

impl Output {
    /// `-` selects standard output, anything else is a file path.
    pub fn parse(value: &str) -> Self {
        match value {
            "-" => Self::Stdout,
            path => Self::File(PathBuf::from(path)),
        }
    }

    pub fn is_stdout(&self) -> bool { matches!(self, Self::Stdout) }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdout => None,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdout => f.write_str("stdout"),
        }
    }
}

/// HTTP client settings shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub user_agent: Option<String>,

    /// Limit on establishing the TCP/TLS connection.
    pub connect_timeout: Duration,

    /// Limit on the whole request including the body. `None` is unlimited.
    pub max_time: Option<Duration>,
}

impl ClientConfig {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        self.user_agent = (!user_agent.is_empty()).then_some(user_agent);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the total request limit; zero means unlimited.
    pub fn max_time(mut self, max_time: Duration) -> Self {
        self.max_time = (!max_time.is_zero()).then_some(max_time);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent:      None,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            max_time:        None,
        }
    }
}
