use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the installer.
/// Every module returns `Result<T, InstallerError>`.
///
/// Stage variants (`AcquisitionFailed`, `DownloadFailed`, ...) wrap the leaf
/// cause so the top level can print the whole chain.
#[derive(Debug, Error)]
pub enum InstallerError {
    // ── Input ───────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Installation cancelled by user")]
    UserCancelled,

    // ── Stages ──────────────────────────────────────────
    #[error("Could not acquire modpack")]
    AcquisitionFailed(#[source] Box<InstallerError>),

    #[error("Required version {0} is not installed")]
    DependencyMissing(String),

    #[error("Mod download failed")]
    DownloadFailed(#[source] Box<InstallerError>),

    #[error("Could not merge overrides")]
    MergeFailed(#[source] Box<InstallerError>),

    #[error("Could not register launcher profile")]
    RegistrationFailed(#[source] Box<InstallerError>),

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid download URL {0}")]
    InvalidUrl(String),

    // ── Manifest ────────────────────────────────────────
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Generic ─────────────────────────────────────────
    #[error("{failed} of {total} mods failed to download")]
    PartialDownload { failed: usize, total: usize },

    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type InstallerResult<T> = Result<T, InstallerError>;

impl InstallerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn acquisition(self) -> Self {
        InstallerError::AcquisitionFailed(Box::new(self))
    }

    pub fn download(self) -> Self {
        InstallerError::DownloadFailed(Box::new(self))
    }

    pub fn merge(self) -> Self {
        InstallerError::MergeFailed(Box::new(self))
    }

    pub fn registration(self) -> Self {
        InstallerError::RegistrationFailed(Box::new(self))
    }

    /// Render the error followed by every nested cause, `a: b: c`.
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            // Leaf variants already print their source inline.
            let text = cause.to_string();
            if !rendered.ends_with(&text) {
                rendered.push_str(": ");
                rendered.push_str(&text);
            }
            current = cause.source();
        }
        rendered
    }
}
