// src/scraping/session.rs
use super::selectors::{
    has_text_any, matches_any, CHALLENGE_INDICATORS, CREDENTIAL_ERRORS, LANDING_INDICATORS,
    LOGIN_IDENTIFIER_INPUT, LOGIN_SECRET_INPUT, LOGIN_SUBMIT,
};
use super::types::Credentials;
use crate::browser::{wait_until, BrowserDriver, BrowserError, BrowserLauncher, PageSnapshot};
use crate::core::ScraperConfig;
use crate::error::{AuthFailure, ScrapeError};
use scraper::Html;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// An authenticated browsing context. One per scrape, never shared.
pub struct Session {
    driver: Box<dyn BrowserDriver>,
    config: ScraperConfig,
    opened_at: Instant,
}

impl Session {
    pub(crate) fn driver(&mut self) -> &mut dyn BrowserDriver {
        self.driver.as_mut()
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Tears down the browser context. Close failures are logged only.
    pub async fn close(mut self) {
        match self.driver.close().await {
            Ok(()) => info!(
                elapsed_ms = self.opened_at.elapsed().as_millis() as u64,
                "Session closed"
            ),
            Err(e) => error!("Failed to close browser session cleanly: {}", e),
        }
    }
}

/// What the page looks like after submitting the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginOutcome {
    Landed,
    Rejected(AuthFailure),
}

pub struct SessionManager {
    launcher: Arc<dyn BrowserLauncher>,
    config: ScraperConfig,
}

impl SessionManager {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: ScraperConfig) -> Self {
        Self { launcher, config }
    }

    /// Opens a browser and logs in exactly once.
    ///
    /// On any failure the browser is closed before the error is returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ScrapeError> {
        if !credentials.is_complete() {
            return Err(ScrapeError::InvalidInput(
                "login identifier and secret are required".to_string(),
            ));
        }

        let mut driver = self.launcher.launch().await?;
        match self.authenticate(driver.as_mut(), credentials).await {
            Ok(()) => {
                info!(site = %self.config.site_url, "Authenticated session ready");
                Ok(Session {
                    driver,
                    config: self.config.clone(),
                    opened_at: Instant::now(),
                })
            }
            Err(e) => {
                if let Err(close_err) = driver.close().await {
                    warn!("Failed to close browser after login failure: {}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn authenticate(
        &self,
        driver: &mut dyn BrowserDriver,
        credentials: &Credentials,
    ) -> Result<(), ScrapeError> {
        let login_url = format!("{}/login", self.config.site_url);
        info!(url = %login_url, "Opening login page");
        driver.goto(&login_url).await?;

        let form_unavailable = |e: BrowserError| {
            warn!("Login form not usable: {}", e);
            ScrapeError::authentication(AuthFailure::LoginFormUnavailable)
        };
        driver
            .fill(LOGIN_IDENTIFIER_INPUT, credentials.identifier())
            .await
            .map_err(form_unavailable)?;
        driver
            .fill(LOGIN_SECRET_INPUT, credentials.secret())
            .await
            .map_err(form_unavailable)?;
        driver.click(LOGIN_SUBMIT).await.map_err(form_unavailable)?;
        debug!("Login form submitted");

        let outcome = wait_until(
            driver,
            self.config.login_timeout,
            self.config.poll_interval,
            classify_login_page,
        )
        .await?;

        match outcome {
            Some(LoginOutcome::Landed) => Ok(()),
            Some(LoginOutcome::Rejected(reason)) => {
                warn!(%reason, "Login rejected");
                Err(ScrapeError::authentication(reason))
            }
            None => {
                warn!(
                    timeout_secs = self.config.login_timeout.as_secs(),
                    "No post-login landing indicator"
                );
                Err(ScrapeError::authentication(AuthFailure::Timeout))
            }
        }
    }
}

fn classify_login_page(page: &PageSnapshot) -> Option<LoginOutcome> {
    if page.url.contains("/checkpoint/challenge") {
        return Some(LoginOutcome::Rejected(AuthFailure::Challenge));
    }

    let document = Html::parse_document(&page.source);
    if page.url.contains("/feed") || matches_any(&document, LANDING_INDICATORS) {
        return Some(LoginOutcome::Landed);
    }
    if matches_any(&document, CHALLENGE_INDICATORS) {
        return Some(LoginOutcome::Rejected(AuthFailure::Challenge));
    }
    if has_text_any(&document, CREDENTIAL_ERRORS)
        || page
            .source
            .to_lowercase()
            .contains("wrong email or password")
    {
        return Some(LoginOutcome::Rejected(AuthFailure::InvalidCredentials));
    }
    None
}
