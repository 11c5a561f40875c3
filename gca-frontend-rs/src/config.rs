use offline::OfflineConfig;
use shell_cache::ShellConfig;

use crate::FrontendError;

/// Where the read-through cache keeps its copies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageBackend {
    #[default]
    LocalStorage,
    /// One file per key in the origin private file system.
    Opfs,
}

/// Everything the page may override, as one JSON object. Missing fields keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontendConfig {
    pub storage: StorageBackend,
    pub opfs_directory: Option<String>,
    #[serde(flatten)]
    pub offline: OfflineConfig,
    pub shell: ShellConfig,
}

impl FrontendConfig {
    pub const DEFAULT_OPFS_DIRECTORY: &'static str = "offline-cache";

    pub fn from_json(json: Option<&str>) -> Result<Self, FrontendError> {
        let config: Self = match json {
            None => return Ok(Self::default()),
            Some(json) if json.trim().is_empty() => return Ok(Self::default()),
            Some(json) => serde_json::from_str(json).map_err(|e| FrontendError::Config(e.to_string()))?,
        };
        config
            .offline
            .validate()
            .map_err(|e| FrontendError::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn opfs_directory(&self) -> &str {
        self.opfs_directory
            .as_deref()
            .unwrap_or(Self::DEFAULT_OPFS_DIRECTORY)
    }
}
