use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::catalog::{CatalogClient, RemoteFileDescriptor};
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::manifest::FileRef;

/// A mod written to the mods directory.
#[derive(Debug, Clone)]
pub struct DownloadedMod {
    pub file: FileRef,
    pub label: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// A mod whose URL resolved but whose download did not complete.
#[derive(Debug)]
pub struct FailedMod {
    pub file: FileRef,
    pub url: String,
    pub error: InstallerError,
}

/// Outcome of the fetch phase. Completed files stay on disk even when
/// siblings failed.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub succeeded: Vec<DownloadedMod>,
    pub failed: Vec<FailedMod>,
}

impl DownloadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Resolves manifest file references through the catalog and downloads the
/// jars, all at once unless a concurrency cap is set.
pub struct ModDownloader {
    catalog: CatalogClient,
    /// `None` runs every request of a phase simultaneously.
    concurrency: Option<usize>,
}

impl ModDownloader {
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            concurrency: None,
        }
    }

    pub fn with_concurrency(mut self, n: Option<usize>) -> Self {
        self.concurrency = n.filter(|n| *n > 0);
        self
    }

    fn fan_out(&self, jobs: usize) -> usize {
        self.concurrency.unwrap_or(jobs).max(1)
    }

    /// Download every file of `files` into `mods_dir`.
    ///
    /// The resolve phase is all-or-nothing: the first failed lookup fails the
    /// call before anything is written. Fetch failures are collected in the
    /// report instead.
    pub async fn download_all(
        &self,
        files: &[FileRef],
        mods_dir: &Path,
    ) -> InstallerResult<DownloadReport> {
        tokio::fs::create_dir_all(mods_dir)
            .await
            .map_err(|e| InstallerError::io(mods_dir, e).download())?;

        if files.is_empty() {
            info!("Manifest lists no mods");
            return Ok(DownloadReport::default());
        }

        let resolved = self.resolve_all(files).await.map_err(|e| e.download())?;
        Ok(self.fetch_all(resolved, mods_dir).await)
    }

    // ── Resolve phase ───────────────────────────────────

    async fn resolve_all(
        &self,
        files: &[FileRef],
    ) -> InstallerResult<Vec<(FileRef, RemoteFileDescriptor)>> {
        info!(
            "Resolving {} mods, concurrency={}",
            files.len(),
            self.fan_out(files.len())
        );

        // Dropping the stream on the first error abandons the lookups still
        // in flight.
        stream::iter(files.iter().copied())
            .map(|file| async move {
                let descriptor = self.catalog.file(file.project_id, file.file_id).await?;
                debug!("Resolved {} -> {}", file, descriptor.download_url);
                Ok::<_, InstallerError>((file, descriptor))
            })
            .buffer_unordered(self.fan_out(files.len()))
            .try_collect()
            .await
    }

    // ── Fetch phase ─────────────────────────────────────

    async fn fetch_all(
        &self,
        resolved: Vec<(FileRef, RemoteFileDescriptor)>,
        mods_dir: &Path,
    ) -> DownloadReport {
        let jobs = resolved.len();
        let outcomes: Vec<_> = stream::iter(resolved)
            .map(|(file, descriptor)| async move {
                let result = self.fetch_one(&descriptor, mods_dir).await;
                (file, descriptor, result)
            })
            .buffer_unordered(self.fan_out(jobs))
            .collect()
            .await;

        let mut report = DownloadReport::default();
        for (file, descriptor, result) in outcomes {
            match result {
                Ok((path, bytes)) => {
                    info!("Downloaded {}.", descriptor.label());
                    report.succeeded.push(DownloadedMod {
                        file,
                        label: descriptor.label().to_string(),
                        path,
                        bytes,
                    });
                }
                Err(error) => {
                    warn!("Failed to download {} ({}): {}", descriptor.label(), file, error);
                    report.failed.push(FailedMod {
                        file,
                        url: descriptor.download_url,
                        error,
                    });
                }
            }
        }
        report
    }

    /// Streams into a private `.part` file, then renames over the final
    /// name, so two mods sharing a file name leave exactly one file behind.
    async fn fetch_one(
        &self,
        descriptor: &RemoteFileDescriptor,
        mods_dir: &Path,
    ) -> InstallerResult<(PathBuf, u64)> {
        let name = file_name_from_url(&descriptor.download_url)?;
        let dest = mods_dir.join(&name);
        let part = mods_dir.join(format!(".{}.part", Uuid::new_v4().simple()));

        let bytes = match self.catalog.download_to(&descriptor.download_url, &part).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };

        tokio::fs::rename(&part, &dest)
            .await
            .map_err(|e| InstallerError::io(&dest, e))?;
        debug!("Downloaded: {} -> {:?}", descriptor.download_url, dest);
        Ok((dest, bytes))
    }
}

/// Last path segment of `url`, kept exactly as it appears in the URL.
pub fn file_name_from_url(url: &str) -> InstallerResult<String> {
    let parsed = url::Url::parse(url).map_err(|_| InstallerError::InvalidUrl(url.to_string()))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| InstallerError::InvalidUrl(url.to_string()))
}
