use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::interaction::UserInteraction;
use crate::core::manifest::PackageManifest;
use crate::core::platform::Platform;

/// Makes sure the launcher has the Minecraft + loader version a pack needs.
pub struct DependencyVerifier {
    platform: Arc<dyn Platform>,
    ui: Arc<dyn UserInteraction>,
    /// Download page for the loader, already resolved for the pack's version.
    index_url: String,
    browser_delay: Duration,
}

impl DependencyVerifier {
    pub fn new(
        platform: Arc<dyn Platform>,
        ui: Arc<dyn UserInteraction>,
        index_url: String,
        browser_delay: Duration,
    ) -> Self {
        Self {
            platform,
            ui,
            index_url,
            browser_delay,
        }
    }

    /// Return once `versions/<mc>-<loader>` exists.
    ///
    /// While it is missing the user is sent to the loader download page and
    /// asked to confirm when done; this repeats until the version shows up.
    /// Declining the prompt aborts with `UserCancelled`.
    pub async fn ensure(&self, manifest: &PackageManifest) -> InstallerResult<()> {
        let required = manifest.version_id();
        let versions_dir = self.platform.versions_dir();

        loop {
            match check_installed(&versions_dir, &required).await {
                Ok(()) => {
                    info!("Found {} in {:?}", required, versions_dir);
                    return Ok(());
                }
                Err(InstallerError::DependencyMissing(_)) => {}
                Err(e) => return Err(e),
            }

            warn!(
                "Please install {} {} for Minecraft {}. Opening your web browser to the download page.",
                loader_name(manifest.mod_loader_id()),
                manifest.mod_loader_id(),
                manifest.minecraft.version
            );
            self.open_download_page();

            let done = self.ui.confirm(&format!(
                "Have you finished installing {}? (no aborts the installation)",
                required
            ));
            if !done {
                return Err(InstallerError::UserCancelled);
            }
        }
    }

    /// Opens the page after `browser_delay` so the instructions are read first.
    fn open_download_page(&self) {
        let platform = Arc::clone(&self.platform);
        let url = self.index_url.clone();
        let delay = self.browser_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = platform.open_url(&url) {
                warn!("Could not open {}: {}. Please open it manually.", url, e);
            }
        });
    }
}

/// A missing `versions` directory counts as an empty one.
async fn installed_versions(versions_dir: &Path) -> InstallerResult<HashSet<String>> {
    let mut entries = match tokio::fs::read_dir(versions_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(InstallerError::io(versions_dir, e)),
    };

    let mut names = HashSet::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| InstallerError::io(versions_dir, e))?
    {
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

async fn check_installed(versions_dir: &Path, required: &str) -> InstallerResult<()> {
    if installed_versions(versions_dir).await?.contains(required) {
        Ok(())
    } else {
        Err(InstallerError::DependencyMissing(required.to_string()))
    }
}

fn loader_name(loader_id: &str) -> &str {
    loader_id.split('-').next().unwrap_or(loader_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TestPlatform {
        root: PathBuf,
        opened: Mutex<Vec<String>>,
    }

    impl Platform for TestPlatform {
        fn minecraft_dir(&self) -> &Path {
            &self.root
        }

        fn open_url(&self, url: &str) -> std::io::Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    /// Answers "yes" and installs the version on the given attempt.
    struct InstallingUser {
        versions_dir: PathBuf,
        version: String,
        install_on: usize,
        asked: AtomicUsize,
    }

    impl UserInteraction for InstallingUser {
        fn confirm(&self, _prompt: &str) -> bool {
            let n = self.asked.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.install_on {
                std::fs::create_dir_all(self.versions_dir.join(&self.version)).unwrap();
            }
            true
        }
    }

    struct DecliningUser;

    impl UserInteraction for DecliningUser {
        fn confirm(&self, _prompt: &str) -> bool {
            false
        }
    }

    fn manifest() -> PackageManifest {
        PackageManifest::parse(
            br#"{
                "minecraft": { "version": "1.16.5", "modLoaders": [ { "id": "forge-36.0.1" } ] },
                "name": "Test Pack",
                "overrides": "overrides",
                "files": [ { "projectID": 1, "fileID": 10 } ]
            }"#,
        )
        .unwrap()
    }

    fn platform(root: &Path) -> Arc<TestPlatform> {
        Arc::new(TestPlatform {
            root: root.to_path_buf(),
            opened: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn present_version_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("versions/1.16.5-forge-36.0.1")).unwrap();

        let platform = platform(dir.path());
        let verifier = DependencyVerifier::new(
            platform.clone(),
            Arc::new(DecliningUser),
            "https://example.com/index".into(),
            Duration::ZERO,
        );

        verifier.ensure(&manifest()).await.unwrap();
        assert!(platform.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn retries_until_installed() {
        let dir = tempfile::tempdir().unwrap();
        let versions_dir = dir.path().join("versions");
        std::fs::create_dir_all(&versions_dir).unwrap();

        let user = Arc::new(InstallingUser {
            versions_dir: versions_dir.clone(),
            version: "1.16.5-forge-36.0.1".into(),
            install_on: 3,
            asked: AtomicUsize::new(0),
        });
        let verifier = DependencyVerifier::new(
            platform(dir.path()),
            user.clone(),
            "https://example.com/index".into(),
            Duration::ZERO,
        );

        verifier.ensure(&manifest()).await.unwrap();
        assert_eq!(user.asked.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn declining_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let verifier = DependencyVerifier::new(
            platform(dir.path()),
            Arc::new(DecliningUser),
            "https://example.com/index".into(),
            Duration::ZERO,
        );

        let err = verifier.ensure(&manifest()).await.unwrap_err();
        assert!(matches!(err, InstallerError::UserCancelled));
    }

    #[tokio::test]
    async fn missing_versions_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_installed(&dir.path().join("versions"), "1.16.5-forge-36.0.1")
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::DependencyMissing(_)));
    }

    #[test]
    fn loader_name_is_prefix() {
        assert_eq!(loader_name("forge-36.0.1"), "forge");
        assert_eq!(loader_name("fabric-0.11.3"), "fabric");
    }
}
