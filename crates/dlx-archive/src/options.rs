/// Extraction settings.
///
/// ```
/// use dlx_archive::ExtractOptions;
///
/// let options = ExtractOptions::default().strip_components(1).max_bytes(8 << 30);
/// assert_eq!(options.limit(), Some(8 << 30));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Leading path segments removed from every entry name and relative link target.
    pub strip_components: usize,
    /// Ceiling on the total bytes written across all entries. `0` disables it.
    pub max_bytes:        u64,
}

impl ExtractOptions {
    pub fn strip_components(mut self, n: usize) -> Self {
        self.strip_components = n;
        self
    }

    pub fn max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    /// The byte ceiling, or `None` when unlimited.
    pub fn limit(&self) -> Option<u64> { (self.max_bytes > 0).then_some(self.max_bytes) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_means_unlimited() {
        assert_eq!(ExtractOptions::default().limit(), None);
        assert_eq!(ExtractOptions::default().max_bytes(100).limit(), Some(100));
    }

    #[test]
    fn builder_sets_fields() {
        let options = ExtractOptions::default().strip_components(2).max_bytes(5);
        assert_eq!(
            options,
            ExtractOptions {
                strip_components: 2,
                max_bytes:        5,
            }
        );
    }
}
