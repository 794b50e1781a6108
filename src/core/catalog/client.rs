use std::path::Path;

use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::model::{AddonInfo, RemoteFileDescriptor};
use crate::core::error::{InstallerError, InstallerResult};

/// Thin client over the catalog's addon API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn addon(&self, project_id: u64) -> InstallerResult<AddonInfo> {
        let url = format!("{}/api/addon/{}", self.base_url, project_id);
        self.get_json(&url).await
    }

    /// Id of the newest file of `project_id`.
    ///
    /// Takes the first `gameVersionLatestFiles` entry as-is; no game-version
    /// matching is attempted.
    pub async fn latest_file_id(&self, project_id: u64) -> InstallerResult<u64> {
        let addon = self.addon(project_id).await?;
        let latest = addon.game_version_latest_files.first().ok_or_else(|| {
            InstallerError::Other(format!("Project {} has no published files", project_id))
        })?;

        if addon.game_version_latest_files.len() > 1 {
            debug!(
                "Project {} lists {} latest files, using the first ({:?})",
                project_id,
                addon.game_version_latest_files.len(),
                latest.game_version
            );
        }
        info!(
            "Latest file of {} is {}",
            addon.name.as_deref().unwrap_or("project"),
            latest.project_file_id
        );
        Ok(latest.project_file_id)
    }

    pub async fn file(&self, project_id: u64, file_id: u64) -> InstallerResult<RemoteFileDescriptor> {
        let url = format!("{}/api/addon/{}/file/{}", self.base_url, project_id, file_id);
        self.get_json(&url).await
    }

    /// Fetch the whole body of `url` into memory.
    pub async fn fetch_bytes(&self, url: &str) -> InstallerResult<Vec<u8>> {
        let response = self.get_ok(url).await?;
        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    /// Stream the body of `url` into `dest`, returning the byte count.
    ///
    /// The file is created (or truncated) before the first chunk arrives.
    pub async fn download_to(&self, url: &str, dest: &Path) -> InstallerResult<u64> {
        let response = self.get_ok(url).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| InstallerError::io(dest, e))?;
        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| InstallerError::io(dest, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| InstallerError::io(dest, e))?;

        Ok(written)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> InstallerResult<T> {
        let response = self.get_ok(url).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!("Malformed JSON from {}: {}", url, e);
            InstallerError::Json(e)
        })
    }

    async fn get_ok(&self, url: &str) -> InstallerResult<Response> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
