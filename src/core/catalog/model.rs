use serde::Deserialize;

/// `GET /api/addon/{id}`; only the fields the installer reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonInfo {
    #[serde(default)]
    pub name: Option<String>,
    pub game_version_latest_files: Vec<LatestFile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestFile {
    pub project_file_id: u64,
    #[serde(default)]
    pub game_version: Option<String>,
}

/// `GET /api/addon/{id}/file/{fileId}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFileDescriptor {
    pub download_url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl RemoteFileDescriptor {
    /// Human-readable label for log lines.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.file_name.as_deref())
            .unwrap_or(&self.download_url)
    }
}
