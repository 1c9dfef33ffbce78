use std::path::Path;

use bytes::Bytes;
use dlx_verify::{HashAlgorithm, Hasher, StreamHasher};
use futures_util::StreamExt;
use tokio::io::{AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use crate::data::{FetchOptions, FetchPhase, Output, Progress};
use crate::effects::http::{BoxStream, HttpClient};
use crate::error::{FetchError, Result};

/// Outcome of a successful download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetched {
    pub bytes_downloaded: u64,
    pub total_bytes:      Option<u64>,
    /// Algorithm whose digest matched, if one was requested.
    pub verified:         Option<HashAlgorithm>,
}

/// Streams a URL into an [`Output`], enforcing the size ceiling and digest
/// from [`FetchOptions`] while the bytes pass through.
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    /// Download `url` into `output`.
    ///
    /// A file output that ends up too large or fails verification is
    /// removed. Standard output with a digest is staged through an anonymous
    /// temporary file so nothing unverified reaches the consumer.
    pub async fn fetch(&self, url: &str, output: &Output, options: &FetchOptions) -> Result<Fetched> {
        tracing::debug!(url, %output, "fetching");
        report(options, FetchPhase::Connecting, 0, None);

        let response = self.client.get(url).await.map_err(FetchError::network)?;
        if response.status != 200 {
            return Err(FetchError::Status { status: response.status });
        }
        let total = response.content_length;
        tracing::debug!(status = response.status, total, "response received");

        let fetched = match output {
            Output::File(path) => self.to_file(response.body, path, total, options).await?,
            Output::Stdout if options.expected.is_some() => self.to_stdout_verified(response.body, total, options).await?,
            Output::Stdout => {
                let mut stdout = tokio::io::stdout();
                stream_to(response.body, &mut stdout, "stdout", total, options).await?
            }
        };

        tracing::info!(url, bytes = fetched.bytes_downloaded, "download complete");
        Ok(fetched)
    }

    async fn to_file(
        &self,
        body: BoxStream<'static, std::result::Result<Bytes, C::Error>>,
        path: &Path,
        total: Option<u64>,
        options: &FetchOptions,
    ) -> Result<Fetched> {
        let mut file = tokio::fs::File::create(path).await.map_err(|source| FetchError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        let target = path.display().to_string();
        let result = stream_to(body, &mut file, &target, total, options).await;
        drop(file);

        if let Err(err) = &result {
            if err.discards_output() {
                if let Err(remove) = tokio::fs::remove_file(path).await {
                    tracing::warn!(path = %path.display(), error = %remove, "failed to remove rejected download");
                }
            }
        }
        result
    }

    async fn to_stdout_verified(
        &self,
        body: BoxStream<'static, std::result::Result<Bytes, C::Error>>,
        total: Option<u64>,
        options: &FetchOptions,
    ) -> Result<Fetched> {
        let staging = tempfile::tempfile().map_err(FetchError::TempFile)?;
        let mut staging = tokio::fs::File::from_std(staging);

        let fetched = stream_to(body, &mut staging, "temp file", total, options).await?;

        staging.rewind().await.map_err(FetchError::TempFile)?;
        let mut stdout = tokio::io::stdout();
        let stdout_err = |source| FetchError::Write {
            target: "stdout".into(),
            source,
        };
        tokio::io::copy(&mut staging, &mut stdout).await.map_err(stdout_err)?;
        stdout.flush().await.map_err(stdout_err)?;

        Ok(fetched)
    }
}

/// Copy `body` into `writer`, hashing as it goes.
///
/// A chunk that would push the total past the ceiling is never written.
async fn stream_to<E, W>(
    mut body: BoxStream<'static, std::result::Result<Bytes, E>>,
    writer: &mut W,
    target: &str,
    total_bytes: Option<u64>,
    options: &FetchOptions,
) -> Result<Fetched>
where
    E: std::error::Error + Send + Sync + 'static,
    W: AsyncWrite + Unpin,
{
    let write_err = |source| FetchError::Write {
        target: target.to_owned(),
        source,
    };
    let mut hasher = options.expected.as_ref().map(|expected| StreamHasher::new(expected.algorithm()));
    let mut downloaded = 0u64;
    report(options, FetchPhase::Downloading, 0, total_bytes);

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(FetchError::network)?;
        let next = downloaded + chunk.len() as u64;
        if let Some(limit) = options.max_bytes.filter(|&limit| next > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        if let Some(hasher) = hasher.as_mut() {
            hasher.update(&chunk);
        }
        writer.write_all(&chunk).await.map_err(write_err)?;
        downloaded = next;
        report(options, FetchPhase::Downloading, downloaded, total_bytes);
    }
    writer.flush().await.map_err(write_err)?;

    let verified = match (hasher, &options.expected) {
        (Some(hasher), Some(expected)) => {
            report(options, FetchPhase::Verifying, downloaded, total_bytes);
            expected.verify(&hasher.finalize_hex())?;
            tracing::debug!(algorithm = %expected.algorithm(), "digest verified");
            Some(expected.algorithm())
        }
        _ => None,
    };

    report(options, FetchPhase::Completed, downloaded, total_bytes);
    Ok(Fetched {
        bytes_downloaded: downloaded,
        total_bytes,
        verified,
    })
}

fn report(options: &FetchOptions, phase: FetchPhase, bytes_downloaded: u64, total_bytes: Option<u64>) {
    if let Some(callback) = &options.on_progress {
        callback(&Progress {
            phase,
            bytes_downloaded,
            total_bytes,
        });
    }
}
