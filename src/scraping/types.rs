// src/scraping/types.rs
use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login identifier and secret. Lives for one login call.
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Reads `LINKEDIN_EMAIL` / `LINKEDIN_PASSWORD`.
    pub fn from_env() -> Result<Self, ScrapeError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScrapeError> {
        let read = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    ScrapeError::MissingCredentials(format!(
                        "{} is not set in the environment",
                        name
                    ))
                })
        };
        Ok(Self::new(read("LINKEDIN_EMAIL")?, read("LINKEDIN_PASSWORD")?))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    pub fn is_complete(&self) -> bool {
        !self.identifier.trim().is_empty() && !self.secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Role and location to search, capped at `limit` listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    role: String,
    location: String,
    limit: usize,
}

impl SearchQuery {
    pub fn new(role: &str, location: &str, limit: usize) -> Result<Self, ScrapeError> {
        let role = role.trim();
        let location = location.trim();
        if role.is_empty() || location.is_empty() {
            return Err(ScrapeError::InvalidInput(
                "role and location are required".to_string(),
            ));
        }
        if limit == 0 {
            return Err(ScrapeError::InvalidInput(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            role: role.to_string(),
            location: location.to_string(),
            limit,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One entry of a result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingHandle {
    pub job_id: String,
    pub detail_url: String,
    pub page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub description: String,
}

impl JobListing {
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_rejects_empty_fields_and_zero_limit() {
        assert!(SearchQuery::new("  ", "New York", 10).is_err());
        assert!(SearchQuery::new("backend developer", "", 10).is_err());
        assert!(SearchQuery::new("backend developer", "New York", 0).is_err());

        let query = SearchQuery::new(" backend developer ", "New York", 3).unwrap();
        assert_eq!(query.role(), "backend developer");
        assert_eq!(query.limit(), 3);
    }

    #[test]
    fn test_credentials_debug_never_shows_secret() {
        let creds = Credentials::new("user@example.com", "s3cret-value");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("user@example.com"));
        assert!(!printed.contains("s3cret-value"));
    }

    #[test]
    fn test_missing_password_is_a_credentials_error() {
        let err = Credentials::from_lookup(|name| {
            (name == "LINKEDIN_EMAIL").then(|| "user@example.com".to_string())
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ScrapeError::MissingCredentials(ref m) if m.contains("LINKEDIN_PASSWORD")
        ));
        assert_eq!(err.code(), "CREDENTIALS_NOT_CONFIGURED");
    }

    #[test]
    fn test_blank_env_values_count_as_missing() {
        let err = Credentials::from_lookup(|_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingCredentials(_)));

        let creds = Credentials::from_lookup(|name| Some(format!("{}-value", name))).unwrap();
        assert_eq!(creds.identifier(), "LINKEDIN_EMAIL-value");
    }

    #[test]
    fn test_incomplete_credentials() {
        assert!(!Credentials::new("", "pw").is_complete());
        assert!(!Credentials::new("user", "").is_complete());
        assert!(Credentials::new("user", "pw").is_complete());
    }
}
