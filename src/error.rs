// src/error.rs
use std::fmt;
use thiserror::Error;

use crate::browser::BrowserError;

/// Why a login attempt did not reach the post-login landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    InvalidCredentials,
    Challenge,
    LoginFormUnavailable,
    Timeout,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AuthFailure::InvalidCredentials => "credentials were rejected",
            AuthFailure::Challenge => "site presented a security challenge",
            AuthFailure::LoginFormUnavailable => "login form could not be used",
            AuthFailure::Timeout => "post-login page did not appear in time",
        };
        f.write_str(text)
    }
}

/// Errors surfaced by the scrape pipeline and the skill corpus.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("authentication failed: {reason}")]
    Authentication { reason: AuthFailure },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("no skills persisted for role '{0}'")]
    NotFound(String),

    #[error("skill corpus storage failed: {0:#}")]
    Persistence(#[source] anyhow::Error),

    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("login credentials not configured: {0}")]
    MissingCredentials(String),
}

impl ScrapeError {
    pub fn authentication(reason: AuthFailure) -> Self {
        ScrapeError::Authentication { reason }
    }

    /// Stable code used in API error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            ScrapeError::InvalidInput(_) => "INVALID_INPUT",
            ScrapeError::Authentication { .. } => "AUTHENTICATION_FAILED",
            ScrapeError::Navigation(_) => "NAVIGATION_FAILED",
            ScrapeError::NotFound(_) => "SKILLS_NOT_FOUND",
            ScrapeError::Persistence(_) => "PERSISTENCE_ERROR",
            ScrapeError::Browser(_) => "BROWSER_ERROR",
            ScrapeError::Configuration(_) => "CONFIGURATION_ERROR",
            ScrapeError::MissingCredentials(_) => "CREDENTIALS_NOT_CONFIGURED",
        }
    }
}

/// Failure of the external text-analysis call for one description.
///
/// Never fatal: the skill extractor skips the listing and moves on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request timed out")]
    Timeout,

    #[error("analysis service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("analysis request failed: {0}")]
    Transport(String),

    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::Timeout
        } else {
            AnalysisError::Transport(err.to_string())
        }
    }
}
