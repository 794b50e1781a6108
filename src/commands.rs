use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use tracing::{debug, info};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::http::build_http_client;
use crate::core::interaction::TerminalInteraction;
use crate::core::pipeline::{InstallOutcome, Installer};
use crate::core::platform;
use crate::core::settings::InstallerSettings;
use crate::core::source::{InstallRequest, PackSource};

/// Install a CurseForge modpack into the stock Minecraft launcher.
#[derive(Debug, Parser)]
#[command(name = "packsmith", version, about, disable_version_flag = true)]
pub struct Cli {
    /// The modpack zip or catalog project id to install
    #[arg(short, long)]
    pub modpack: String,

    /// The folder to install the modpack to (required for zip files)
    #[arg(short, long)]
    pub location: Option<PathBuf>,

    /// Settings file to use instead of the default one
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Launcher data directory, if not the platform default
    #[arg(long)]
    pub minecraft_dir: Option<PathBuf>,

    /// Cap on simultaneous mod downloads (unbounded by default)
    #[arg(long)]
    pub max_concurrent_downloads: Option<usize>,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

impl Cli {
    /// File settings with command-line overrides applied.
    fn settings(&self) -> InstallerResult<InstallerSettings> {
        let mut settings = InstallerSettings::load(self.config.as_deref())?;
        if let Some(dir) = &self.minecraft_dir {
            settings.minecraft_dir = Some(dir.clone());
        }
        if let Some(n) = self.max_concurrent_downloads {
            if n == 0 {
                return Err(InstallerError::InvalidInput(
                    "--max-concurrent-downloads must be at least 1".into(),
                ));
            }
            settings.max_concurrent_downloads = Some(n);
        }
        debug!("Effective settings: {:?}", settings);
        Ok(settings)
    }
}

/// Validate the command line and run the installation.
///
/// Arguments are checked before the settings file or the platform is touched.
pub async fn install(cli: Cli) -> InstallerResult<InstallOutcome> {
    let source = PackSource::classify(&cli.modpack, cli.location.as_deref())?;
    let settings = cli.settings()?;
    let platform = platform::detect(settings.minecraft_dir.clone())?;

    let request = InstallRequest::new(
        source,
        cli.location.as_deref(),
        &platform.minecraft_dir().join("modpacks"),
    );
    info!("Installing {:?} into {:?}", request.source, request.destination);

    let client = build_http_client(&settings)?;
    let installer = Installer::new(settings, client, platform, Arc::new(TerminalInteraction));
    installer.install(&request).await
}
