//! Streaming HTTP download with a size ceiling and digest verification.
//!
//! # Architecture
//!
//! - [`data`] - options, output selection and progress snapshots
//! - [`core`] - pure URL and file-name derivation
//! - effects - the [`HttpClient`] seam and the [`Fetcher`] that drives it
//!
//! Bytes are hashed as they stream, so the body is read once. Progress is
//! reported through a callback; rendering is left to the caller.

pub mod core;
pub mod data;
mod effects;
mod error;

pub use self::core::{DEFAULT_OUTPUT, normalize_url, output_name};
pub use self::data::{ClientConfig, FetchOptions, FetchPhase, Output, Progress, ProgressCallback};
#[cfg(feature = "reqwest")]
pub use self::effects::ReqwestClient;
pub use self::effects::{BoxStream, Fetched, Fetcher, HttpClient, Response};
pub use self::error::{FetchError, Result};
