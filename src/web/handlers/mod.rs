// src/web/handlers/mod.rs
pub mod scrape_handlers;
pub mod skills_handlers;
pub mod system_handlers;

pub use scrape_handlers::*;
pub use skills_handlers::*;
pub use system_handlers::*;

use crate::error::ScrapeError;
use crate::web::types::StandardErrorResponse;
use rocket::http::Status;
use rocket::serde::json::Json;

pub type ApiError = (Status, Json<StandardErrorResponse>);

/// Maps a pipeline or corpus error to its HTTP status and error envelope.
pub fn api_error(err: &ScrapeError, conversation_id: Option<String>) -> ApiError {
    let (status, suggestions) = match err {
        ScrapeError::InvalidInput(_) => (
            Status::BadRequest,
            vec![
                "Provide a non-empty role and location".to_string(),
                "Use a limit of at least 1".to_string(),
            ],
        ),
        ScrapeError::Authentication { .. } => (
            Status::Unauthorized,
            vec![
                "Check LINKEDIN_EMAIL and LINKEDIN_PASSWORD".to_string(),
                "Complete any pending security challenge in a regular browser".to_string(),
            ],
        ),
        ScrapeError::Navigation(_) => (
            Status::BadGateway,
            vec!["The job site did not return search results, try again later".to_string()],
        ),
        ScrapeError::MissingCredentials(_) => (
            Status::BadRequest,
            vec!["Set LINKEDIN_EMAIL and LINKEDIN_PASSWORD before scraping".to_string()],
        ),
        ScrapeError::NotFound(_) => (
            Status::NotFound,
            vec!["Run a scrape for this role first".to_string()],
        ),
        ScrapeError::Persistence(_) | ScrapeError::Browser(_) | ScrapeError::Configuration(_) => (
            Status::InternalServerError,
            vec!["Check the server logs".to_string()],
        ),
    };

    (
        status,
        Json(StandardErrorResponse::new(
            err.to_string(),
            err.code().to_string(),
            suggestions,
            conversation_id,
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthFailure;

    #[test]
    fn test_error_statuses() {
        let cases = [
            (ScrapeError::InvalidInput("x".into()), Status::BadRequest),
            (
                ScrapeError::authentication(AuthFailure::Challenge),
                Status::Unauthorized,
            ),
            (ScrapeError::Navigation("x".into()), Status::BadGateway),
            (ScrapeError::NotFound("qa".into()), Status::NotFound),
            (
                ScrapeError::MissingCredentials("LINKEDIN_EMAIL".into()),
                Status::BadRequest,
            ),
            (
                ScrapeError::Persistence(anyhow::anyhow!("disk full")),
                Status::InternalServerError,
            ),
        ];
        for (err, expected) in cases {
            let (status, body) = api_error(&err, None);
            assert_eq!(status, expected);
            assert_eq!(body.error_code, err.code());
            assert!(!body.success);
        }
    }
}
