// src/skills/store.rs
use super::types::{normalize_role, Corpus, SkillSet};
use crate::core::FsOps;
use crate::error::ScrapeError;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// File-backed role → skills corpus.
///
/// Writers in this process are serialized; each write re-reads the file,
/// swaps one role's entry and renames a fresh copy over the old one.
#[derive(Debug)]
pub struct SkillStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SkillStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole corpus; a missing file is an empty corpus.
    pub async fn load(&self) -> Result<Corpus, ScrapeError> {
        let content = FsOps::read_optional(&self.path)
            .await
            .map_err(ScrapeError::Persistence)?;

        match content {
            None => {
                debug!("No corpus at {}, starting empty", self.path.display());
                Ok(Corpus::new())
            }
            Some(content) if content.trim().is_empty() => Ok(Corpus::new()),
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("Corrupt skill corpus at {}", self.path.display()))
                .map_err(ScrapeError::Persistence),
        }
    }

    pub async fn get(&self, role: &str) -> Result<SkillSet, ScrapeError> {
        self.load()
            .await?
            .get(role)
            .cloned()
            .ok_or_else(|| ScrapeError::NotFound(normalize_role(role)))
    }

    /// Overwrites `role`'s entry, leaving every other role untouched.
    pub async fn persist(&self, role: &str, skills: &SkillSet) -> Result<(), ScrapeError> {
        let role = normalize_role(role);
        if role.is_empty() {
            return Err(ScrapeError::InvalidInput("role must not be empty".to_string()));
        }

        let _guard = self.write_lock.lock().await;

        let mut corpus = self.load().await?;
        corpus.replace(&role, skills.clone());

        let json = serde_json::to_string_pretty(&corpus)
            .context("Failed to serialize skill corpus")
            .map_err(ScrapeError::Persistence)?;
        FsOps::write_atomic(&self.path, &json)
            .await
            .map_err(ScrapeError::Persistence)?;

        info!(
            role = %role,
            skills = skills.len(),
            roles = corpus.len(),
            "Persisted skills to {}",
            self.path.display()
        );
        Ok(())
    }
}
