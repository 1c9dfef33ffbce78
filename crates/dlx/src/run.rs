use std::fmt::Display;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dlx_archive::{ExtractOptions, detect_file};
use dlx_fetch::{ClientConfig, FetchError, FetchOptions, Fetched, Fetcher, Output, ReqwestClient, normalize_url, output_name};
use dlx_verify::{ExpectedHash, VerificationError};
use indicatif::HumanBytes;

use crate::cli::App;
use crate::progress::DownloadTracker;
use crate::size::parse_byte_size;

/// User-facing status lines on stderr, silenced by `--quiet`.
struct Status {
    quiet: bool,
}

impl Status {
    fn say(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}

pub fn run(app: &App) -> Result<()> {
    if let Some(dir) = &app.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {:?}", dir.display().to_string()))?;
    }

    let url = normalize_url(&app.url);
    let output = match app.output.as_deref() {
        Some(output) if !output.is_empty() => Output::parse(output),
        _ => Output::File(output_name(&url).into()),
    };

    if app.extract_archive && output.is_stdout() {
        bail!("cannot extract archive when output is stdout (-)");
    }

    let max_bytes = parse_byte_size(&app.max_bytes).context("invalid --max-bytes value")?;
    let extract_max_bytes = parse_byte_size(&app.extract_max_bytes).context("invalid --extract-max-bytes value")?;

    let expected = app
        .hash
        .as_deref()
        .filter(|hash| !hash.is_empty())
        .map(str::parse::<ExpectedHash>)
        .transpose()?;

    let status = Status { quiet: app.quiet };
    tracing::debug!(%url, %output, max_bytes, "starting download");
    download(app, &url, &output, max_bytes, expected, &status)?;

    if let Output::File(archive) = &output {
        if app.extract_archive {
            extract(app, archive, extract_max_bytes, &status)?;
        }
    }

    Ok(())
}

fn download(
    app: &App,
    url: &str,
    output: &Output,
    max_bytes: u64,
    expected: Option<ExpectedHash>,
    status: &Status,
) -> Result<Fetched> {
    let config = ClientConfig::default()
        .user_agent(app.user_agent.as_str())
        .connect_timeout(app.connect_timeout)
        .max_time(app.max_time);
    let client = ReqwestClient::new(&config)?;

    let tracker = DownloadTracker::new(app.quiet);
    let mut options = FetchOptions::default().max_bytes(max_bytes).on_progress(tracker.callback());
    if let Some(expected) = expected {
        options = options.expected(expected);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let result = runtime.block_on(Fetcher::new(client).fetch(url, output, &options));

    let fetched = match result {
        Ok(fetched) => {
            tracker.finish();
            fetched
        }
        Err(err) => {
            tracker.abandon();
            if let FetchError::Checksum(VerificationError::Mismatch { algorithm, .. }) = &err {
                status.say(format_args!("❌ error: invalid {} sum", algorithm.display_name()));
            }
            if let FetchError::TooLarge { limit } = &err {
                bail!("download exceeded maximum size limit of {}", HumanBytes(*limit));
            }
            return Err(err.into());
        }
    };

    if let Some(algorithm) = fetched.verified {
        status.say(format_args!("✅ {} sum hash matches", algorithm.display_name()));
    }
    let size = HumanBytes(fetched.total_bytes.unwrap_or(fetched.bytes_downloaded));
    match output {
        Output::File(path) => status.say(format_args!("Downloaded {size} to {}", path.display())),
        Output::Stdout => status.say(format_args!("Downloaded {size}")),
    }

    Ok(fetched)
}

fn extract(app: &App, archive: &Path, max_bytes: u64, status: &Status) -> Result<()> {
    status.say("Detecting archive type...");
    let archive_type = detect_file(archive).context("error detecting archive type")?;
    if !archive_type.is_known() {
        bail!("unknown or unsupported archive format");
    }
    status.say(format_args!("Detected archive type: {archive_type}"));
    status.say("Extracting...");

    let options = ExtractOptions::default()
        .strip_components(app.extract_strip_components)
        .max_bytes(max_bytes);
    let extracted = dlx_archive::extract(archive, archive_type, &options).context("error extracting archive")?;
    tracing::info!(entries = extracted.entries, bytes = extracted.bytes, "archive extracted");
    status.say("✅ Extraction complete");

    if app.remove_archive {
        match std::fs::remove_file(archive) {
            Ok(()) => status.say(format_args!("Removed archive file: {}", archive.display())),
            Err(err) => eprintln!("Warning: failed to remove archive file: {err}"),
        }
    }

    Ok(())
}
