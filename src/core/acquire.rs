use tracing::info;

use crate::core::catalog::CatalogClient;
use crate::core::error::InstallerResult;
use crate::core::source::PackSource;
use crate::core::staging::StagingArea;

/// Obtain the modpack contents in a fresh staging area.
///
/// Any failure comes back wrapped in `AcquisitionFailed`.
pub async fn acquire(source: &PackSource, catalog: &CatalogClient) -> InstallerResult<StagingArea> {
    let staged = match source {
        PackSource::LocalArchive(path) => StagingArea::from_archive(path).await,
        PackSource::Remote(project_id) => download_pack(*project_id, catalog).await,
    };
    staged.map_err(|e| e.acquisition())
}

async fn download_pack(project_id: u64, catalog: &CatalogClient) -> InstallerResult<StagingArea> {
    info!("Downloading modpack {}...", project_id);

    let file_id = catalog.latest_file_id(project_id).await?;
    let file = catalog.file(project_id, file_id).await?;
    info!("Fetching {}", file.label());
    let bytes = catalog.fetch_bytes(&file.download_url).await?;

    StagingArea::from_bytes(bytes).await
}
