use std::sync::Arc;

use dlx_fetch::{FetchPhase, Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const BAR_STYLE: &str =
    "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";

const SPINNER_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static BAR_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(BAR_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> =
    Lazy::new(|| ProgressStyle::with_template(SPINNER_STYLE).ok().map(|style| style.tick_chars(TICK)));

/// Terminal progress for one download, fed by fetch progress callbacks.
pub struct DownloadTracker {
    pb: ProgressBar,
}

impl DownloadTracker {
    pub fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::no_length()
        };
        if let Some(style) = SPINNER_TEMPLATE.as_ref() {
            pb.set_style(style.clone());
        }
        Self { pb }
    }

    pub fn callback(&self) -> ProgressCallback {
        let pb = self.pb.clone();
        Arc::new(move |progress: &Progress| update(&pb, progress))
    }

    pub fn finish(&self) { self.pb.finish(); }

    pub fn abandon(&self) { self.pb.abandon(); }
}

fn update(pb: &ProgressBar, progress: &Progress) {
    match progress.phase {
        FetchPhase::Connecting => pb.set_message("connecting"),
        FetchPhase::Downloading => {
            if let Some(total) = progress.total_bytes {
                if pb.length() != Some(total) {
                    pb.set_length(total);
                    if let Some(style) = BAR_TEMPLATE.as_ref() {
                        pb.set_style(style.clone());
                    }
                }
            }
            pb.set_message("");
            pb.set_position(progress.bytes_downloaded);
        }
        FetchPhase::Verifying => pb.set_message("verifying"),
        FetchPhase::Completed => pb.set_message(""),
    }
}
