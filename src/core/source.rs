use std::path::{Path, PathBuf};

use crate::core::error::{InstallerError, InstallerResult};

/// Where the modpack comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackSource {
    /// A modpack zip already on disk.
    LocalArchive(PathBuf),
    /// A catalog project id; the latest file is installed.
    Remote(u64),
}

/// One validated installation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub source: PackSource,
    pub destination: PathBuf,
}

impl PackSource {
    /// Classify raw `--modpack` input.
    ///
    /// Archives must exist and need an explicit `location`; anything else has
    /// to be a positive project id. Only the archive path is touched on disk.
    pub fn classify(modpack: &str, location: Option<&Path>) -> InstallerResult<Self> {
        let modpack = modpack.trim();
        if modpack.is_empty() {
            return Err(InstallerError::InvalidInput("Please input a modpack".into()));
        }

        let candidate = Path::new(modpack);
        if is_archive(candidate) {
            if !candidate.is_file() {
                return Err(InstallerError::InvalidInput(format!(
                    "Modpack archive {:?} does not exist",
                    candidate
                )));
            }
            if location.is_none() {
                return Err(InstallerError::InvalidInput(
                    "--location is required when installing from an archive".into(),
                ));
            }
            return Ok(PackSource::LocalArchive(candidate.to_path_buf()));
        }

        modpack
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .map(PackSource::Remote)
            .ok_or_else(|| {
                InstallerError::InvalidInput(format!(
                    "{:?} must be an archive path or a numeric package id",
                    modpack
                ))
            })
    }
}

impl InstallRequest {
    /// Classify raw `--modpack` input and pick the destination.
    ///
    /// `default_root` is the parent used for remote installs without a
    /// `--location` (`<default_root>/<id>`).
    pub fn resolve(
        modpack: &str,
        location: Option<&Path>,
        default_root: &Path,
    ) -> InstallerResult<Self> {
        let source = PackSource::classify(modpack, location)?;
        Ok(Self::new(source, location, default_root))
    }

    /// Build a request for an already classified source.
    pub fn new(source: PackSource, location: Option<&Path>, default_root: &Path) -> Self {
        let destination = match (location, &source) {
            (Some(path), _) => path.to_path_buf(),
            (None, PackSource::Remote(id)) => default_root.join(id.to_string()),
            (None, PackSource::LocalArchive(_)) => default_root.to_path_buf(),
        };
        Self {
            source,
            destination,
        }
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_input_is_remote() {
        let req = InstallRequest::resolve("285109", None, Path::new("/mc/modpacks")).unwrap();
        assert_eq!(req.source, PackSource::Remote(285109));
        assert_eq!(req.destination, PathBuf::from("/mc/modpacks/285109"));
    }

    #[test]
    fn remote_honours_location() {
        let req =
            InstallRequest::resolve("42", Some(Path::new("/games/pack")), Path::new("/mc")).unwrap();
        assert_eq!(req.destination, PathBuf::from("/games/pack"));
    }

    #[test]
    fn archive_requires_existing_file() {
        let err = InstallRequest::resolve("/nope/pack.zip", Some(Path::new("/x")), Path::new("/mc"))
            .unwrap_err();
        assert!(matches!(err, InstallerError::InvalidInput(_)));
    }

    #[test]
    fn archive_requires_location() {
        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("Pack.ZIP");
        std::fs::write(&zip, b"PK").unwrap();

        let err = InstallRequest::resolve(zip.to_str().unwrap(), None, Path::new("/mc"))
            .unwrap_err();
        assert!(matches!(err, InstallerError::InvalidInput(_)));

        let req =
            InstallRequest::resolve(zip.to_str().unwrap(), Some(dir.path()), Path::new("/mc"))
                .unwrap();
        assert_eq!(req.source, PackSource::LocalArchive(zip));
    }

    #[test]
    fn garbage_is_rejected() {
        for input in ["abc", "", "-3", "0", "12abc"] {
            let err = InstallRequest::resolve(input, None, Path::new("/mc")).unwrap_err();
            assert!(matches!(err, InstallerError::InvalidInput(_)), "{input}");
        }
    }
}
