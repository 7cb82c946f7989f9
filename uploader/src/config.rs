//! Client configuration

use url::Url;

use crate::validation::MAX_FILE_SIZE;

/// Explicit configuration handed to the uploader at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    /// Base URL of the signed-URL issuer
    pub endpoint: Url,
    /// Largest file accepted for upload, in bytes
    pub max_file_size: u64,
}

impl UploaderConfig {
    /// Configuration with the default 100 MiB limit
    #[must_use]
    pub const fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Overrides the size limit
    #[must_use]
    pub const fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}
