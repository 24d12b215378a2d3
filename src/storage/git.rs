// src/storage/git.rs
use crate::errors::PublishError;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

/// Commits one file and pushes it with the git CLI. Credentials (SSH key or
/// token helper) are whatever the repository is already configured with.
pub struct GitRepo {
    dir: PathBuf,
    commit_prefix: String,
}

impl GitRepo {
    pub fn new(dir: PathBuf, commit_prefix: String) -> Self {
        Self { dir, commit_prefix }
    }

    async fn git(&self, step: &'static str, args: &[&str]) -> Result<Output, PublishError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .await
            .map_err(|e| PublishError::Git {
                step,
                detail: e.to_string(),
            })
    }

    async fn git_checked(&self, step: &'static str, args: &[&str]) -> Result<(), PublishError> {
        let output = self.git(step, args).await?;
        if !output.status.success() {
            return Err(PublishError::Git {
                step,
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    pub fn commit_message(&self, as_of: &str) -> String {
        format!("{} {}", self.commit_prefix, as_of)
    }

    pub async fn commit_and_push(&self, file: &Path, as_of: &str) -> Result<(), PublishError> {
        let file = file.to_string_lossy();
        self.git_checked("add", &["add", &*file]).await?;

        // Exits non-zero when the snapshot did not change; that is not an error.
        let message = self.commit_message(as_of);
        let commit = self.git("commit", &["commit", "-m", message.as_str()]).await?;
        if !commit.status.success() {
            debug!("git commit made no commit: {}", String::from_utf8_lossy(&commit.stdout).trim());
        }

        self.git_checked("push", &["push"]).await?;
        info!("📤 Pushed snapshot {}", as_of);
        Ok(())
    }
}
