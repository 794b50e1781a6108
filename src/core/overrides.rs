use std::path::Path;

use tracing::{debug, info};

use crate::core::error::{InstallerError, InstallerResult};

/// Copy everything under `overrides_dir` into `destination`.
///
/// Directories are merged, files at the same relative path are replaced.
/// Failures come back wrapped in `MergeFailed`; files copied before the
/// failure stay in place.
pub async fn merge_overrides(overrides_dir: &Path, destination: &Path) -> InstallerResult<usize> {
    let source = overrides_dir.to_path_buf();
    let target = destination.to_path_buf();

    let copied = tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&target).map_err(|e| InstallerError::io(&target, e))?;
        copy_dir_recursive(&source, &target)
    })
    .await
    .map_err(|e| InstallerError::Other(format!("Overrides task failed: {}", e)).merge())?
    .map_err(InstallerError::merge)?;

    info!("Copied {} override files into {:?}", copied, destination);
    Ok(copied)
}

/// Returns the number of files copied.
fn copy_dir_recursive(source: &Path, destination: &Path) -> InstallerResult<usize> {
    let entries = std::fs::read_dir(source).map_err(|e| InstallerError::io(source, e))?;
    let mut copied = 0;

    for entry in entries {
        let entry = entry.map_err(|e| InstallerError::io(source, e))?;
        let src_path = entry.path();
        let dst_path = destination.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| InstallerError::io(&src_path, e))?;

        if file_type.is_dir() {
            std::fs::create_dir_all(&dst_path).map_err(|e| InstallerError::io(&dst_path, e))?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            replace_file(&src_path, &dst_path)?;
            copied += 1;
        } else {
            debug!("Skipping non-regular override entry {:?}", src_path);
        }
    }

    Ok(copied)
}

fn replace_file(src: &Path, dst: &Path) -> InstallerResult<()> {
    if dst.is_dir() {
        std::fs::remove_dir_all(dst).map_err(|e| InstallerError::io(dst, e))?;
    } else if dst.exists() {
        std::fs::remove_file(dst).map_err(|e| InstallerError::io(dst, e))?;
    }
    std::fs::copy(src, dst).map_err(|e| InstallerError::io(dst, e))?;
    Ok(())
}
