//! Managed image storage client
//!
//! Gallery images, cake reference photos and payment receipts live in an
//! external file service. The API is key-authenticated:
//!
//! - `POST   {api_url}/files`        multipart `file`, `fileName`, `folder`
//! - `GET    {api_url}/files?path=`  list a folder
//! - `DELETE {api_url}/files/{id}`

use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::models::StoredFile;
use crate::utils::errors::{BakeshopError, Result, StorageError};
use crate::utils::helpers::{storage_file_name, truncate_text};
use crate::utils::logging::{log_api_error, log_storage_operation};

/// File record as returned by the storage API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteFile {
    file_id: String,
    url: String,
    #[serde(default)]
    file_type: Option<String>,
    #[serde(default)]
    size: Option<u64>,
}

impl From<RemoteFile> for StoredFile {
    fn from(file: RemoteFile) -> Self {
        Self {
            storage_id: file.file_id,
            url: file.url,
            content_type: file.file_type,
            size: file.size,
        }
    }
}

#[derive(Clone)]
pub struct StorageService {
    config: StorageConfig,
    client: Client,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("Bakeshop-Backend/1.0")
            .build()?;

        Ok(Self { config, client })
    }

    pub fn default_folder(&self) -> &str {
        &self.config.default_folder
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Reject payloads the service should never see
    pub fn check_upload(&self, size: usize, content_type: &str) -> std::result::Result<(), StorageError> {
        if size > self.config.max_upload_bytes {
            return Err(StorageError::TooLarge {
                size,
                limit: self.config.max_upload_bytes,
            });
        }

        let accepted = self
            .config
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type));
        if !accepted {
            return Err(StorageError::UnsupportedContentType(content_type.to_string()));
        }

        Ok(())
    }

    /// Upload a file and return its hosted location
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
        folder: Option<&str>,
    ) -> Result<StoredFile> {
        self.check_upload(bytes.len(), content_type)?;

        let folder = folder.unwrap_or(&self.config.default_folder).to_string();
        let name = storage_file_name(filename);
        let started = Instant::now();
        debug!(file_name = %name, folder = %folder, size = bytes.len(), "Uploading file");

        let part = Part::bytes(bytes)
            .file_name(name.clone())
            .mime_str(content_type)
            .map_err(|e| StorageError::UnsupportedContentType(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("fileName", name.clone())
            .text("folder", folder);

        let response = self
            .client
            .post(self.endpoint("files"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()));

        let result = match response {
            Ok(response) if response.status().is_success() => response
                .json::<RemoteFile>()
                .await
                .map(StoredFile::from)
                .map_err(|e| StorageError::InvalidResponse(e.to_string())),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                log_api_error("storage", &format!("upload answered {}", status), Some(&truncate_text(&body, 200)));
                Err(StorageError::UploadFailed(format!("HTTP {}: {}", status, truncate_text(&body, 200))))
            }
            Err(e) => Err(e),
        };

        log_storage_operation("upload", &name, started.elapsed().as_millis() as u64, result.is_ok());
        let stored = result?;
        info!(storage_id = %stored.storage_id, "File uploaded");
        Ok(stored)
    }

    /// Remove a hosted file
    pub async fn delete(&self, storage_id: &str) -> Result<()> {
        if storage_id.trim().is_empty() {
            return Err(BakeshopError::InvalidInput("storage_id is required".to_string()));
        }

        let started = Instant::now();
        let url = self.endpoint(&format!("files/{}", urlencoding::encode(storage_id)));

        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()));

        let result = match response {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                Err(BakeshopError::not_found("Stored file", storage_id))
            }
            Ok(response) => Err(StorageError::DeleteFailed(format!("HTTP {}", response.status())).into()),
            Err(e) => Err(e.into()),
        };

        log_storage_operation("delete", storage_id, started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    /// List files in a folder, defaulting to the configured one
    pub async fn list(&self, folder: Option<&str>) -> Result<Vec<StoredFile>> {
        let folder = folder.unwrap_or(&self.config.default_folder);
        let started = Instant::now();

        let response = self
            .client
            .get(self.endpoint("files"))
            .bearer_auth(&self.config.api_key)
            .query(&[("path", folder)])
            .send()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        if !response.status().is_success() {
            log_storage_operation("list", folder, started.elapsed().as_millis() as u64, false);
            return Err(StorageError::InvalidResponse(format!("HTTP {}", response.status())).into());
        }

        let files: Vec<RemoteFile> = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        log_storage_operation("list", folder, started.elapsed().as_millis() as u64, true);
        Ok(files.into_iter().map(StoredFile::from).collect())
    }
}
