//! Immutable configuration and progress types.

pub mod options;
pub mod progress;

pub use options::{ClientConfig, FetchOptions, FetchPhase, Output, ProgressCallback};
pub use progress::Progress;
