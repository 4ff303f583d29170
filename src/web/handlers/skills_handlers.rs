// src/web/handlers/skills_handlers.rs
use super::{api_error, ApiError};
use crate::skills::{aggregate_for_role, normalize_role, SkillGapReport};
use crate::web::types::{
    AnalyzeSkillsRequest, DataResponse, RoleSkills, StandardRequest, WithConversationId,
};
use crate::web::AppState;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn get_skills_handler(
    role: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<RoleSkills>>, ApiError> {
    let skills = state.store.get(role).await.map_err(|e| {
        warn!(role = role, "Skills lookup failed: {}", e);
        api_error(&e, None)
    })?;

    let role = normalize_role(role);
    Ok(Json(DataResponse::success(
        format!("{} skills stored for '{}'", skills.len(), role),
        RoleSkills { role, skills },
        None,
    )))
}

pub async fn analyze_skills_handler(
    request: Json<StandardRequest<AnalyzeSkillsRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SkillGapReport>>, ApiError> {
    let conversation_id = request.conversation_id();
    let body = &request.data;

    let corpus = state
        .store
        .load()
        .await
        .map_err(|e| api_error(&e, conversation_id.clone()))?;

    let gap = aggregate_for_role(&body.user_skills, &corpus, &body.role)
        .map_err(|e| api_error(&e, conversation_id.clone()))?;

    info!(
        role = %body.role,
        common = gap.common.len(),
        missing = gap.missing.len(),
        "Skill gap computed"
    );

    let report = state.advisor.advise(&body.user_skills, gap).await;

    let message = format!(
        "{} of {} market skills already covered, {} recommendations",
        report.gap.common.len(),
        report.gap.common.len() + report.gap.missing.len(),
        report.recommendations.len()
    );
    Ok(Json(DataResponse::success(message, report, conversation_id)))
}
