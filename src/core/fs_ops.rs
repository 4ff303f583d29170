// src/core/fs_ops.rs
//! File system helpers shared by the corpus store and the CLI

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() || path.exists() {
            return Ok(());
        }
        fs::create_dir_all(path)
            .await
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        info!("Created directory: {}", path.display());
        Ok(())
    }

    /// Reads a file, treating a missing file as `None`.
    pub async fn read_optional(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read file: {}", path.display()))
            }
        }
    }

    /// Replaces `path` with `content` as a single unit.
    ///
    /// The content goes to a uniquely named sibling first and is renamed over
    /// the target, so readers see either the old file or the new one.
    pub async fn write_atomic(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        let tmp_path = Self::temp_sibling(path);
        if let Err(e) = Self::write_synced(&tmp_path, content).await {
            Self::discard(&tmp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, path).await {
            Self::discard(&tmp_path).await;
            return Err(e).with_context(|| {
                format!(
                    "Failed to move {} into place at {}",
                    tmp_path.display(),
                    path.display()
                )
            });
        }

        debug!("Atomically replaced {}", path.display());
        Ok(())
    }

    async fn write_synced(path: &Path, content: &str) -> Result<()> {
        let mut file = fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("Failed to sync file: {}", path.display()))?;
        Ok(())
    }

    async fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove temp file {}: {}", path.display(), e);
            }
        }
    }

    fn temp_sibling(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("corpus");
        path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
    }
}
