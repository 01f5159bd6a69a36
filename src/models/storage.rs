//! Hosted file model

use serde::{Deserialize, Serialize};

/// A file held by the image storage service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub storage_id: String,
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageListQuery {
    pub folder: Option<String>,
}
