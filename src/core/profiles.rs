// ─── Launcher Profiles ───
// Read-modify-write of the stock launcher's `launcher_profiles.json`.
// There is no lock: two installers writing the same store at once lose
// one of the updates.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::manifest::PackageManifest;

const PROFILES_KEY: &str = "profiles";

/// One entry under `profiles`, in the launcher's own field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub created: String,
    pub game_dir: PathBuf,
    pub icon: String,
    pub last_version_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub profile_type: String,
}

impl ProfileRecord {
    pub fn for_manifest(manifest: &PackageManifest, game_dir: PathBuf, icon: &str) -> Self {
        Self {
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            game_dir,
            icon: icon.to_string(),
            last_version_id: manifest.version_id(),
            name: manifest.name.clone(),
            profile_type: "custom".to_string(),
        }
    }
}

/// The whole store, kept as the raw document so keys the installer does not
/// know about are carried through untouched and in their original order.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileStore {
    document: Map<String, Value>,
}

impl ProfileStore {
    pub async fn load(path: &Path) -> InstallerResult<Self> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| InstallerError::io(path, e))?;
        let store: ProfileStore = serde_json::from_slice(&raw)?;
        match store.document.get(PROFILES_KEY) {
            None | Some(Value::Object(_)) => Ok(store),
            Some(_) => Err(InstallerError::Other(format!(
                "{:?}: `{}` is not an object",
                path, PROFILES_KEY
            ))),
        }
    }

    pub async fn save(&self, path: &Path) -> InstallerResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| InstallerError::io(path, e))
    }

    /// Profiles currently in the store, `None` when the key is absent.
    pub fn profiles(&self) -> Option<&Map<String, Value>> {
        self.document.get(PROFILES_KEY).and_then(Value::as_object)
    }

    /// Insert or replace the profile stored under `key`. A new key goes last,
    /// an existing one keeps its position.
    pub fn upsert(&mut self, key: String, record: &ProfileRecord) -> InstallerResult<()> {
        let value = serde_json::to_value(record)?;
        let profiles = self
            .document
            .entry(PROFILES_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        match profiles {
            Value::Object(profiles) => {
                profiles.insert(key, value);
                Ok(())
            }
            _ => Err(InstallerError::Other(format!(
                "`{}` is not an object",
                PROFILES_KEY
            ))),
        }
    }
}

/// Store key for a pack: only the first space becomes an underscore.
pub fn profile_key(pack_name: &str) -> String {
    pack_name.replacen(' ', "_", 1)
}

/// Register the installed pack with the launcher.
///
/// Errors come back wrapped in `RegistrationFailed`; an unreadable store is
/// never rewritten.
pub async fn register_profile(
    store_path: &Path,
    manifest: &PackageManifest,
    destination: &Path,
    icon: &str,
) -> InstallerResult<String> {
    register(store_path, manifest, destination, icon)
        .await
        .map_err(InstallerError::registration)
}

async fn register(
    store_path: &Path,
    manifest: &PackageManifest,
    destination: &Path,
    icon: &str,
) -> InstallerResult<String> {
    let game_dir = std::path::absolute(destination).map_err(|e| InstallerError::io(destination, e))?;

    let mut store = ProfileStore::load(store_path).await?;
    let key = profile_key(&manifest.name);
    let record = ProfileRecord::for_manifest(manifest, game_dir, icon);
    store.upsert(key.clone(), &record)?;
    store.save(store_path).await?;

    info!("Registered launcher profile '{}' -> {}", key, record.last_version_id);
    Ok(key)
}
