//! Extraction configuration.

/// Default chunked-transfer buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for an extraction call.
///
/// # Examples
///
/// ```
/// use decant_core::ExtractConfig;
///
/// let config = ExtractConfig::default()
///     .with_buffer_size(1024)
///     .with_atomic(true);
/// assert_eq!(config.buffer_size, 1024);
/// assert!(config.atomic);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Capacity of the intermediate buffer used to stream entry payloads.
    ///
    /// Any value of at least one byte is valid; zero is treated as one.
    pub buffer_size: usize,

    /// Recreate symlink entries instead of skipping them.
    pub allow_symlinks: bool,

    /// Extract into a temporary sibling directory and rename it onto the
    /// destination only when every entry succeeded.
    pub atomic: bool,
}

impl Default for ExtractConfig {
    /// Default values:
    /// - `buffer_size`: 64 KiB
    /// - `allow_symlinks`: false (symlink entries are skipped)
    /// - `atomic`: false (partial output stays on disk after a failure)
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            allow_symlinks: false,
            atomic: false,
        }
    }
}

impl ExtractConfig {
    /// Sets the transfer buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Enables or disables symlink materialization.
    #[must_use]
    pub fn with_symlinks(mut self, allow: bool) -> Self {
        self.allow_symlinks = allow;
        self
    }

    /// Enables or disables atomic extraction.
    #[must_use]
    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Returns the buffer size actually used for transfers.
    #[must_use]
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(1)
    }
}
