// src/browser/mod.rs
//! Browser seam used by the scraper.
//!
//! Everything the scraper does to a page goes through [`BrowserDriver`]: load a
//! URL, read the rendered source, fill and click form controls. Parsing happens
//! on the returned source with `scraper`, so the driver stays small and can be
//! swapped for an in-memory site in tests.

pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

pub use webdriver::{WebDriverBrowser, WebDriverLauncher};

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to start browser session: {0}")]
    Launch(String),

    #[error("failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("element '{selector}' not usable: {message}")]
    Element { selector: String, message: String },

    #[error("browser command failed: {0}")]
    Command(String),
}

/// One live browsing context.
#[async_trait]
pub trait BrowserDriver: Send {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn current_url(&mut self) -> Result<String, BrowserError>;

    /// Rendered DOM of the current page.
    async fn page_source(&mut self) -> Result<String, BrowserError>;

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Tears down the context. Calling it twice must be harmless.
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Opens fresh, independent browsing contexts.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, BrowserError>;
}

/// Snapshot handed to `wait_until` checks.
pub struct PageSnapshot {
    pub url: String,
    pub source: String,
}

/// Polls the current page until `check` yields a value or `timeout` elapses.
///
/// Returns `Ok(None)` on timeout. Checks run synchronously on an owned
/// snapshot, so parsed documents never live across an await point.
pub async fn wait_until<T, F>(
    driver: &mut dyn BrowserDriver,
    timeout: Duration,
    poll_interval: Duration,
    mut check: F,
) -> Result<Option<T>, BrowserError>
where
    F: FnMut(&PageSnapshot) -> Option<T>,
{
    let deadline = Instant::now() + timeout;
    loop {
        let snapshot = PageSnapshot {
            url: driver.current_url().await?,
            source: driver.page_source().await?,
        };
        if let Some(found) = check(&snapshot) {
            return Ok(Some(found));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(poll_interval).await;
    }
}
