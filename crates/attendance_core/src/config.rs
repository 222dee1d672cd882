//! Store configuration.

use crate::service::timetable_import::DEFAULT_PALETTE;

/// Storage key the subject snapshot is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "attendance-data";

/// Runtime options for `SubjectStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key used with the key-value collaborator.
    pub storage_key: String,
    /// Colors cycled through when importing subjects. May be empty.
    pub palette: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            palette: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
