// src/storage/snapshot_file.rs
use crate::errors::PublishError;
use crate::types::PortfolioSnapshot;
use std::path::{Path, PathBuf};

/// Writes the snapshot as pretty JSON. The file is replaced atomically:
/// readers see either the previous snapshot or the new one, never a prefix.
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, snapshot: &PortfolioSnapshot) -> Result<(), PublishError> {
        let data = serde_json::to_string_pretty(snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| PublishError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, data)
            .await
            .map_err(|source| PublishError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| PublishError::Io {
                path: self.path.clone(),
                source,
            })?;

        Ok(())
    }
}
