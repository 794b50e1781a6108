// ─── Modpack Manifest ───
// Parses the CurseForge `manifest.json` shipped inside a modpack zip.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::core::error::{InstallerError, InstallerResult};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Structured view of `manifest.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub minecraft: MinecraftTarget,
    pub overrides: String,
    #[serde(default)]
    pub files: Vec<FileRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinecraftTarget {
    pub version: String,
    pub mod_loaders: Vec<ModLoader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModLoader {
    pub id: String,
}

/// A mod referenced by catalog ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FileRef {
    #[serde(rename = "projectID")]
    pub project_id: u64,
    #[serde(rename = "fileID")]
    pub file_id: u64,
}

impl std::fmt::Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.project_id, self.file_id)
    }
}

impl PackageManifest {
    /// Read `manifest.json` from an extracted modpack.
    pub async fn load(staging_root: &Path) -> InstallerResult<Self> {
        let path = staging_root.join(MANIFEST_FILE);
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|e| InstallerError::io(&path, e))?;
        let manifest = Self::parse(&raw)?;

        info!(
            "Loaded manifest for '{}' (Minecraft {}, {}, {} mods)",
            manifest.name,
            manifest.minecraft.version,
            manifest.mod_loader_id(),
            manifest.files.len()
        );
        Ok(manifest)
    }

    pub fn parse(raw: &[u8]) -> InstallerResult<Self> {
        let manifest: PackageManifest = serde_json::from_slice(raw)?;
        if manifest.minecraft.mod_loaders.is_empty() {
            return Err(InstallerError::InvalidManifest(
                "minecraft.modLoaders is empty".into(),
            ));
        }
        Ok(manifest)
    }

    /// The primary loader; always present after `parse`.
    pub fn mod_loader_id(&self) -> &str {
        self.minecraft
            .mod_loaders
            .first()
            .map(|l| l.id.as_str())
            .unwrap_or_default()
    }

    /// Version directory name the launcher uses, e.g. `1.16.5-forge-36.0.1`.
    pub fn version_id(&self) -> String {
        format!("{}-{}", self.minecraft.version, self.mod_loader_id())
    }

    pub fn overrides_dir(&self, staging_root: &Path) -> PathBuf {
        staging_root.join(&self.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "minecraft": {
            "version": "1.16.5",
            "modLoaders": [ { "id": "forge-36.0.1", "primary": true } ]
        },
        "manifestType": "minecraftModpack",
        "manifestVersion": 1,
        "name": "Test Pack",
        "version": "1.0",
        "author": "someone",
        "files": [
            { "projectID": 1, "fileID": 10, "required": true },
            { "projectID": 2, "fileID": 20, "required": false }
        ],
        "overrides": "overrides"
    }"#;

    #[test]
    fn parses_curseforge_manifest() {
        let manifest = PackageManifest::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(manifest.name, "Test Pack");
        assert_eq!(manifest.version_id(), "1.16.5-forge-36.0.1");
        assert_eq!(
            manifest.files,
            vec![
                FileRef { project_id: 1, file_id: 10 },
                FileRef { project_id: 2, file_id: 20 },
            ]
        );
        assert_eq!(
            manifest.overrides_dir(Path::new("/tmp/stage")),
            PathBuf::from("/tmp/stage/overrides")
        );
    }

    #[test]
    fn missing_files_means_empty() {
        let raw = r#"{
            "minecraft": { "version": "1.12.2", "modLoaders": [ { "id": "forge-14.23.5.2855" } ] },
            "name": "Bare",
            "overrides": "overrides"
        }"#;
        let manifest = PackageManifest::parse(raw.as_bytes()).unwrap();
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn loaderless_manifest_is_rejected() {
        let raw = r#"{
            "minecraft": { "version": "1.16.5", "modLoaders": [] },
            "name": "Vanilla",
            "overrides": "overrides"
        }"#;
        let err = PackageManifest::parse(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, InstallerError::InvalidManifest(_)));
    }

    #[tokio::test]
    async fn load_reports_missing_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = PackageManifest::load(dir.path()).await.unwrap_err();
        match err {
            InstallerError::Io { path, .. } => assert!(path.ends_with(MANIFEST_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
