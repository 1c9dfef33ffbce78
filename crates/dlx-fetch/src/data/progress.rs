use crate::data::options::FetchPhase;

/// Snapshot passed to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: FetchPhase,

    /// Bytes written to the output so far.
    pub bytes_downloaded: u64,

    /// From Content-Length, when the server sent one.
    pub total_bytes: Option<u64>,
}
