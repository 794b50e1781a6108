use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{InstallerError, InstallerResult};

const APP_DIR_NAME: &str = "packsmith";
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_CATALOG_URL: &str = "https://curse.nikky.moe";
pub const DEFAULT_DEPENDENCY_INDEX_URL: &str =
    "https://files.minecraftforge.net/net/minecraftforge/forge/index_{version}.html";

/// Installer settings, persisted as `settings.json` in the user config dir.
///
/// Every field has a default so a partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    /// Base URL of the catalog API (no trailing slash).
    pub catalog_url: String,
    pub connect_timeout_secs: u64,
    /// Longest silence allowed between two reads of a response; a slow
    /// download that keeps delivering bytes is never cut off.
    pub read_timeout_secs: u64,
    /// `None` keeps the download fan-out unbounded.
    pub max_concurrent_downloads: Option<usize>,
    /// Delay before the browser is opened on the dependency download page.
    pub browser_delay_ms: u64,
    /// `{version}` is replaced with the Minecraft version.
    pub dependency_index_url: String,
    pub profile_icon: String,
    /// Overrides the platform's `.minecraft` location.
    pub minecraft_dir: Option<PathBuf>,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            connect_timeout_secs: 15,
            read_timeout_secs: 60,
            max_concurrent_downloads: None,
            browser_delay_ms: 5000,
            dependency_index_url: DEFAULT_DEPENDENCY_INDEX_URL.to_string(),
            profile_icon: "Redstone_Block".to_string(),
            minecraft_dir: None,
        }
    }
}

impl InstallerSettings {
    /// Load settings from `explicit` if given, otherwise from the default
    /// location. A missing default file yields the defaults; a missing
    /// explicit file or an unparsable one is an error.
    pub fn load(explicit: Option<&Path>) -> InstallerResult<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match default_settings_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> InstallerResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| InstallerError::io(path, e))?;
        let settings: InstallerSettings = serde_json::from_str(&raw).map_err(|e| {
            InstallerError::InvalidInput(format!("settings file {:?} is invalid: {}", path, e))
        })?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn browser_delay(&self) -> Duration {
        Duration::from_millis(self.browser_delay_ms)
    }

    /// Download page for the mod loader matching `minecraft_version`.
    pub fn dependency_page(&self, minecraft_version: &str) -> String {
        self.dependency_index_url
            .replace("{version}", minecraft_version)
    }

    pub fn catalog_base(&self) -> &str {
        self.catalog_url.trim_end_matches('/')
    }
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE))
}
