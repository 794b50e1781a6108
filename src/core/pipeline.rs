use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use tracing::{error, info};

use crate::core::acquire::acquire;
use crate::core::catalog::CatalogClient;
use crate::core::dependency::DependencyVerifier;
use crate::core::downloader::{DownloadedMod, ModDownloader};
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::interaction::UserInteraction;
use crate::core::manifest::{PackageManifest, MANIFEST_FILE};
use crate::core::overrides::merge_overrides;
use crate::core::platform::Platform;
use crate::core::profiles::register_profile;
use crate::core::settings::InstallerSettings;
use crate::core::source::InstallRequest;

/// What a finished installation produced.
#[derive(Debug)]
pub struct InstallOutcome {
    pub pack_name: String,
    pub destination: PathBuf,
    pub profile_key: String,
    pub mods: Vec<DownloadedMod>,
    pub override_files: usize,
}

/// Runs one installation end to end.
///
/// Stages run strictly in order and the first failure stops the run. Nothing
/// written before a failure is rolled back. The destination and the launcher
/// profile store are assumed to have a single writer.
pub struct Installer {
    settings: InstallerSettings,
    catalog: CatalogClient,
    platform: Arc<dyn Platform>,
    ui: Arc<dyn UserInteraction>,
}

impl Installer {
    pub fn new(
        settings: InstallerSettings,
        client: Client,
        platform: Arc<dyn Platform>,
        ui: Arc<dyn UserInteraction>,
    ) -> Self {
        let catalog = CatalogClient::new(client, settings.catalog_base());
        Self {
            settings,
            catalog,
            platform,
            ui,
        }
    }

    pub async fn install(&self, request: &InstallRequest) -> InstallerResult<InstallOutcome> {
        let destination = &request.destination;

        if !self.confirm_overwrite(destination) {
            info!("Keeping the existing modpack at {:?}", destination);
            return Err(InstallerError::UserCancelled);
        }

        info!("Getting modpack files...");
        let staging = acquire(&request.source, &self.catalog).await?;
        let manifest = PackageManifest::load(staging.path())
            .await
            .map_err(|e| e.acquisition())?;
        info!("Done getting modpack files.");

        info!("Checking for {}...", manifest.version_id());
        self.verifier(&manifest).ensure(&manifest).await?;

        info!("Downloading {} mods...", manifest.files.len());
        let report = ModDownloader::new(self.catalog.clone())
            .with_concurrency(self.settings.max_concurrent_downloads)
            .download_all(&manifest.files, &destination.join("mods"))
            .await?;
        if !report.is_complete() {
            for failed in &report.failed {
                error!("Could not download {} from {}: {}", failed.file, failed.url, failed.error.chain());
            }
            return Err(InstallerError::PartialDownload {
                failed: report.failed.len(),
                total: report.total(),
            }
            .download());
        }
        info!("Done downloading mods.");

        info!("Copying overrides...");
        let override_files =
            merge_overrides(&manifest.overrides_dir(staging.path()), destination).await?;
        write_marker(staging.path(), destination)
            .await
            .map_err(InstallerError::merge)?;
        info!("Done copying overrides.");

        info!("Adding profile to the launcher...");
        let profile_key = register_profile(
            &self.platform.launcher_profiles(),
            &manifest,
            destination,
            &self.settings.profile_icon,
        )
        .await?;
        info!("Done adding profile to the launcher.");

        Ok(InstallOutcome {
            pack_name: manifest.name.clone(),
            destination: destination.clone(),
            profile_key,
            mods: report.succeeded,
            override_files,
        })
    }

    /// `true` when there is nothing to overwrite or the user agreed.
    fn confirm_overwrite(&self, destination: &Path) -> bool {
        if !destination.join(MANIFEST_FILE).exists() {
            return true;
        }
        self.ui.confirm(&format!(
            "A modpack already exists at {}, do you want to overwrite it?",
            destination.display()
        ))
    }

    fn verifier(&self, manifest: &PackageManifest) -> DependencyVerifier {
        DependencyVerifier::new(
            Arc::clone(&self.platform),
            Arc::clone(&self.ui),
            self.settings.dependency_page(&manifest.minecraft.version),
            self.settings.browser_delay(),
        )
    }
}

/// Leave the pack's manifest in the destination so later runs can tell a
/// modpack is already installed there.
async fn write_marker(staging_root: &Path, destination: &Path) -> InstallerResult<()> {
    let source = staging_root.join(MANIFEST_FILE);
    let target = destination.join(MANIFEST_FILE);
    tokio::fs::copy(&source, &target)
        .await
        .map_err(|e| InstallerError::io(&target, e))?;
    Ok(())
}
