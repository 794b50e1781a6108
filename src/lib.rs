pub mod commands;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::core::error::InstallerError;

/// Exit status when the user declines a prompt.
pub const EXIT_CANCELLED: u8 = 2;

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,packsmith_lib=debug")),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Could not start the async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(commands::install(cli)) {
        Ok(outcome) => {
            info!(
                "Installed '{}' ({} mods, {} override files) into {:?} as profile '{}'",
                outcome.pack_name,
                outcome.mods.len(),
                outcome.override_files,
                outcome.destination,
                outcome.profile_key
            );
            ExitCode::SUCCESS
        }
        Err(InstallerError::UserCancelled) => {
            warn!("Installation cancelled");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            error!("{}", e.chain());
            ExitCode::FAILURE
        }
    }
}
