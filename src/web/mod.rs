// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::scraping::{ScrapePipeline, ScrapeReport};
use crate::skills::{SkillAdvisor, SkillGapReport, SkillStore};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::info;

/// Shared by every request; the store is the one the pipeline writes to.
pub struct AppState {
    pub pipeline: ScrapePipeline,
    pub store: Arc<SkillStore>,
    pub advisor: SkillAdvisor,
    pub default_limit: usize,
}

impl AppState {
    pub fn new(pipeline: ScrapePipeline, advisor: SkillAdvisor, default_limit: usize) -> Self {
        let store = pipeline.store().clone();
        Self {
            pipeline,
            store,
            advisor,
            default_limit,
        }
    }
}

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/scrape-jobs", data = "<request>")]
pub async fn scrape_jobs(
    request: Json<StandardRequest<ScrapeJobsRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeReport>>, ApiError> {
    handlers::scrape_jobs_handler(request, state).await
}

#[get("/skills/<role>")]
pub async fn get_skills(
    role: String,
    state: &State<AppState>,
) -> Result<Json<DataResponse<RoleSkills>>, ApiError> {
    handlers::get_skills_handler(&role, state).await
}

#[post("/analyze-skills", data = "<request>")]
pub async fn analyze_skills(
    request: Json<StandardRequest<AnalyzeSkillsRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SkillGapReport>>, ApiError> {
    handlers::analyze_skills_handler(request, state).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Scrape requests need role and location, analysis needs role and user_skills".to_string()],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Unknown endpoint".to_string(),
        "NOT_FOUND".to_string(),
        vec!["See /api/health for a liveness check".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Mounts every route and catcher under `/api`.
pub fn build_rocket(rocket: Rocket<Build>, state: AppState) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, unprocessable, not_found, internal_error],
        )
        .mount(
            "/api",
            routes![scrape_jobs, get_skills, analyze_skills, health, options],
        )
}

pub async fn start_web_server(state: AppState, port: u16) -> Result<()> {
    info!("Starting skill gap API server");
    info!("Corpus: {}", state.store.path().display());
    info!("Server: http://0.0.0.0:{}", port);

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    let _rocket = build_rocket(rocket::custom(figment), state)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{scraper_config, FakeSite, SITE_URL};
    use crate::scraping::SessionManager;
    use crate::skills::extractor::tests::KeywordAnalyzer;
    use crate::skills::SkillExtractor;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;

    async fn client(dir: &tempfile::TempDir) -> Client {
        let store = Arc::new(SkillStore::new(dir.path().join("job_skills.json")));
        store
            .persist(
                "backend developer",
                &["python", "sql", "docker"].iter().collect(),
            )
            .await
            .unwrap();

        let site = FakeSite::new(SITE_URL);
        let analyzer = Arc::new(KeywordAnalyzer::default());
        let pipeline = ScrapePipeline::new(
            SessionManager::new(site.launcher(), scraper_config()),
            SkillExtractor::new(analyzer.clone()),
            store,
        );
        let state = AppState::new(pipeline, SkillAdvisor::new(analyzer), 10);
        let rocket = build_rocket(rocket::build(), state);
        Client::tracked(rocket).await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;

        let response = client.get("/api/health").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["message"], "OK");
    }

    #[tokio::test]
    async fn test_get_skills_for_known_and_unknown_role() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;

        let response = client.get("/api/skills/Backend%20Developer").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["skills"], serde_json::json!(["docker", "python", "sql"]));

        let response = client.get("/api/skills/astronaut").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "SKILLS_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_analyze_skills() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;

        let response = client
            .post("/api/analyze-skills")
            .header(ContentType::JSON)
            .body(r#"{"role": "backend developer", "user_skills": ["Python", "SQL"], "conversation_id": "c-1"}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["common"], serde_json::json!(["python", "sql"]));
        assert_eq!(body["data"]["missing"], serde_json::json!(["docker"]));
        assert_eq!(body["data"]["recommendations"], serde_json::json!(["learn docker"]));
        assert_eq!(body["conversation_id"], "c-1");
    }

    #[tokio::test]
    async fn test_analyze_skills_without_recommendations_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;
        let store = SkillStore::new(dir.path().join("job_skills.json"));
        store
            .persist("mainframe developer", &["cobol", "jcl"].iter().collect())
            .await
            .unwrap();

        let response = client
            .post("/api/analyze-skills")
            .header(ContentType::JSON)
            .body(r#"{"role": "mainframe developer", "user_skills": ["JCL"]}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["missing"], serde_json::json!(["cobol"]));
        assert_eq!(body["data"]["recommendations"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_scrape_rejects_empty_role() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;

        let response = client
            .post("/api/scrape-jobs")
            .header(ContentType::JSON)
            .body(r#"{"role": "  ", "location": "Berlin"}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "INVALID_INPUT");
    }
}
