use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

pub const DEFAULT_USER_AGENT: &str = concat!("dlx/", env!("CARGO_PKG_VERSION"));

/// Download a file over HTTP, following redirects.
///
/// Optionally verifies a digest and extracts archives (zip, tar, tar.gz,
/// tar.bz2, tar.xz, tar.zst) detected from their content.
#[derive(Clone, Debug, Parser)]
#[command(name = "dlx", version = env!("CARGO_PKG_VERSION"), about, long_about)]
pub struct App {
    /// The URL to download
    #[arg(short = 'U', long)]
    pub url: String,

    /// File to write to, `-` for stdout [default: last URL segment]
    #[arg(short = 'O', long)]
    pub output: Option<String>,

    /// Show no progress or status output
    #[arg(short, long)]
    pub quiet: bool,

    /// Expected digest with algorithm prefix, e.g. sha256:<hex> (sha256, sha512)
    #[arg(short = 'H', long, value_name = "ALGO:HEX")]
    pub hash: Option<String>,

    /// Extract the downloaded archive into the working directory
    #[arg(short = 'x', long)]
    pub extract_archive: bool,

    /// Delete the archive after a successful extraction
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub remove_archive: bool,

    /// Change the working directory before anything else
    #[arg(short = 'C', long, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Strip N leading components from entry names during extraction
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub extract_strip_components: usize,

    /// Limit on establishing the connection
    #[arg(long, default_value = "300s", value_parser = humantime::parse_duration)]
    pub connect_timeout: Duration,

    /// Limit on the whole request, 0 for unlimited
    #[arg(short = 'm', long, default_value = "0", value_parser = humantime::parse_duration)]
    pub max_time: Duration,

    /// User-Agent header sent with the request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum bytes to download, e.g. 4GiB or 512MB
    #[arg(short = 'M', long, default_value = "4GiB", value_name = "SIZE")]
    pub max_bytes: String,

    /// Maximum total bytes to extract from the archive
    #[arg(long, default_value = "8GiB", value_name = "SIZE")]
    pub extract_max_bytes: String,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
