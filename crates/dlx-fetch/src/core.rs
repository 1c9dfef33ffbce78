//! Pure helpers deriving request and output names from user input.

/// File name used when the URL has no usable last segment.
pub const DEFAULT_OUTPUT: &str = "download";

/// Prefix `https://` unless the URL already starts with `http`.
///
/// ```
/// use dlx_fetch::normalize_url;
///
/// assert_eq!(normalize_url("example.com/a.zip"), "https://example.com/a.zip");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// ```
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}

/// Output file name for `url`: everything after the last `/`, with any
/// query string removed.
pub fn output_name(url: &str) -> String {
    let last = url.rsplit_once('/').map_or("", |(_, last)| last);
    let name = last.split_once('?').map_or(last, |(name, _)| name);

    if last.is_empty() || name.is_empty() {
        DEFAULT_OUTPUT.to_owned()
    } else {
        name.to_owned()
    }
}
