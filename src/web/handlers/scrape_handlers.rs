// src/web/handlers/scrape_handlers.rs
use super::{api_error, ApiError};
use crate::scraping::{Credentials, ScrapeReport, SearchQuery};
use crate::web::types::{DataResponse, ScrapeJobsRequest, StandardRequest, WithConversationId};
use crate::web::AppState;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn scrape_jobs_handler(
    request: Json<StandardRequest<ScrapeJobsRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeReport>>, ApiError> {
    let conversation_id = request.conversation_id();
    let body = &request.data;
    let limit = body.limit.unwrap_or(state.default_limit);

    let query = SearchQuery::new(&body.role, &body.location, limit)
        .map_err(|e| api_error(&e, conversation_id.clone()))?;

    let credentials = Credentials::from_env().map_err(|e| {
        error!("Scrape requested without credentials configured: {}", e);
        api_error(&e, conversation_id.clone())
    })?;

    info!(
        role = query.role(),
        location = query.location(),
        limit = query.limit(),
        "Scrape requested"
    );

    match state.pipeline.scrape(&credentials, query).await {
        Ok(report) => {
            let message = format!(
                "Scraped {} listings for '{}', {} skills found",
                report.listings.len(),
                report.role,
                report.skills.len()
            );
            Ok(Json(DataResponse::success(message, report, conversation_id)))
        }
        Err(e) => Err(api_error(&e, conversation_id)),
    }
}
