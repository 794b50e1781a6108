use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::core::error::{InstallerError, InstallerResult};

const STAGING_PREFIX: &str = "packsmith-";

/// Temporary directory holding one extracted modpack.
///
/// Removed when dropped, on success and on failure alike.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create an empty, uniquely named directory under the OS temp dir.
    pub fn create() -> InstallerResult<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    pub fn create_in(parent: &Path) -> InstallerResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| InstallerError::io(parent, e))?;
        debug!("Created staging area {:?}", dir.path());
        Ok(Self { dir })
    }

    /// Extract the zip at `archive` into a new staging area.
    pub async fn from_archive(archive: &Path) -> InstallerResult<Self> {
        let archive = archive.to_path_buf();
        let staging = Self::create()?;
        let target = staging.path().to_path_buf();

        info!("Extracting modpack files from {:?}...", archive);
        tokio::task::spawn_blocking(move || {
            let file =
                std::fs::File::open(&archive).map_err(|e| InstallerError::io(&archive, e))?;
            extract_into(file, &target)
        })
        .await
        .map_err(|e| InstallerError::Other(format!("Extraction task failed: {}", e)))??;

        info!("Finished extracting modpack files.");
        Ok(staging)
    }

    /// Extract an in-memory zip into a new staging area.
    pub async fn from_bytes(bytes: Vec<u8>) -> InstallerResult<Self> {
        let staging = Self::create()?;
        let target = staging.path().to_path_buf();

        info!("Extracting modpack files ({} bytes)...", bytes.len());
        tokio::task::spawn_blocking(move || extract_into(Cursor::new(bytes), &target))
            .await
            .map_err(|e| InstallerError::Other(format!("Extraction task failed: {}", e)))??;

        info!("Finished extracting modpack files.");
        Ok(staging)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Entry names escaping `target` are rejected by the zip crate.
fn extract_into<R: Read + Seek>(reader: R, target: &Path) -> InstallerResult<()> {
    let mut archive = zip::ZipArchive::new(reader)?;
    debug!("Archive has {} entries", archive.len());
    archive.extract(target)?;
    Ok(())
}
