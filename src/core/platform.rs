// ─── Platform ───
// Where the stock launcher keeps its data, and how to open a web page,
// resolved once at startup for the running OS.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tracing::debug;

use crate::core::error::{InstallerError, InstallerResult};

const PROFILES_FILE: &str = "launcher_profiles.json";

/// Host-application paths and desktop integration for one OS.
pub trait Platform: Send + Sync {
    /// The launcher's data directory (`.minecraft`).
    fn minecraft_dir(&self) -> &Path;

    /// Open `url` in the user's default browser.
    fn open_url(&self, url: &str) -> std::io::Result<()>;

    /// Installed game and loader versions, one directory per version id.
    fn versions_dir(&self) -> PathBuf {
        self.minecraft_dir().join("versions")
    }

    fn launcher_profiles(&self) -> PathBuf {
        self.minecraft_dir().join(PROFILES_FILE)
    }
}

pub struct WindowsPlatform {
    root: PathBuf,
}

pub struct MacPlatform {
    root: PathBuf,
}

pub struct LinuxPlatform {
    root: PathBuf,
}

impl WindowsPlatform {
    /// `%APPDATA%\.minecraft`
    pub fn locate() -> Option<Self> {
        dirs::data_dir().map(|dir| Self {
            root: dir.join(".minecraft"),
        })
    }
}

impl MacPlatform {
    /// `~/Library/Application Support/minecraft`
    pub fn locate() -> Option<Self> {
        dirs::data_dir().map(|dir| Self {
            root: dir.join("minecraft"),
        })
    }
}

impl LinuxPlatform {
    /// `~/.minecraft`
    pub fn locate() -> Option<Self> {
        dirs::home_dir().map(|dir| Self {
            root: dir.join(".minecraft"),
        })
    }
}

impl Platform for WindowsPlatform {
    fn minecraft_dir(&self) -> &Path {
        &self.root
    }

    fn open_url(&self, url: &str) -> std::io::Result<()> {
        // The empty argument is the window title `start` expects.
        spawn_detached(Command::new("cmd").args(["/C", "start", "", url]))
    }
}

impl Platform for MacPlatform {
    fn minecraft_dir(&self) -> &Path {
        &self.root
    }

    fn open_url(&self, url: &str) -> std::io::Result<()> {
        spawn_detached(Command::new("open").arg(url))
    }
}

impl Platform for LinuxPlatform {
    fn minecraft_dir(&self) -> &Path {
        &self.root
    }

    fn open_url(&self, url: &str) -> std::io::Result<()> {
        spawn_detached(Command::new("xdg-open").arg(url))
    }
}

fn spawn_detached(command: &mut Command) -> std::io::Result<()> {
    debug!("Spawning {:?}", command);
    command.spawn().map(|_| ())
}

/// Pick the implementation for the running OS.
///
/// `minecraft_dir` replaces the platform default when set.
pub fn detect(minecraft_dir: Option<PathBuf>) -> InstallerResult<Arc<dyn Platform>> {
    let platform: Arc<dyn Platform> = if cfg!(target_os = "windows") {
        let mut p = WindowsPlatform::locate().ok_or_else(no_data_dir)?;
        if let Some(root) = minecraft_dir {
            p.root = root;
        }
        Arc::new(p)
    } else if cfg!(target_os = "macos") {
        let mut p = MacPlatform::locate().ok_or_else(no_data_dir)?;
        if let Some(root) = minecraft_dir {
            p.root = root;
        }
        Arc::new(p)
    } else if cfg!(target_os = "linux") {
        let mut p = LinuxPlatform::locate().ok_or_else(no_data_dir)?;
        if let Some(root) = minecraft_dir {
            p.root = root;
        }
        Arc::new(p)
    } else {
        return Err(InstallerError::Other(format!(
            "Unsupported operating system: {}",
            std::env::consts::OS
        )));
    };

    debug!("Minecraft directory: {:?}", platform.minecraft_dir());
    Ok(platform)
}

fn no_data_dir() -> InstallerError {
    InstallerError::Other("Could not determine the user data directory".into())
}
