// src/storage/mod.rs
pub mod git;
pub mod snapshot_file;

use crate::config::PublishConfig;
use crate::connectors::traits::PublishSink;
use crate::errors::PublishError;
use crate::types::PortfolioSnapshot;
use async_trait::async_trait;
use git::GitRepo;
use snapshot_file::SnapshotWriter;

/// Writes the snapshot file, then commits and pushes it when git is enabled.
pub struct SnapshotPublisher {
    writer: SnapshotWriter,
    git: Option<GitRepo>,
}

impl SnapshotPublisher {
    pub fn new(writer: SnapshotWriter, git: Option<GitRepo>) -> Self {
        Self { writer, git }
    }

    pub fn from_config(config: &PublishConfig) -> Self {
        let writer = SnapshotWriter::new(config.repo_dir.join(&config.output_path));
        let git = config
            .git_enabled
            .then(|| GitRepo::new(config.repo_dir.clone(), config.commit_prefix.clone()));
        Self::new(writer, git)
    }
}

#[async_trait]
impl PublishSink for SnapshotPublisher {
    async fn publish(&self, snapshot: &PortfolioSnapshot) -> Result<(), PublishError> {
        self.writer.write(snapshot).await?;
        if let Some(git) = &self.git {
            git.commit_and_push(self.writer.path(), &snapshot.as_of).await?;
        }
        Ok(())
    }
}
