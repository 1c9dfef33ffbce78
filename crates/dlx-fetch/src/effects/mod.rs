//! I/O: the HTTP client seam and the streaming fetcher.

mod fetcher;
mod http;

pub use fetcher::{Fetched, Fetcher};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use http::{BoxStream, HttpClient, Response};
