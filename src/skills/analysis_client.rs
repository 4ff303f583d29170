// src/skills/analysis_client.rs
use crate::core::AnalysisConfig;
use crate::error::AnalysisError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, error, info};

const GENERATE_ENDPOINT: &str = "/api/generate";
const MAX_DESCRIPTION_CHARS: usize = 8000;

/// Text-analysis capability: skill tokens from job descriptions, and learning
/// advice for a skill gap.
#[async_trait]
pub trait SkillAnalyzer: Send + Sync {
    async fn analyze_description(&self, text: &str) -> Result<BTreeSet<String>, AnalysisError>;

    /// Short, ordered suggestions for closing the gap between the two lists.
    async fn recommend(
        &self,
        user_skills: &[String],
        missing_skills: &[String],
    ) -> Result<Vec<String>, AnalysisError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct SkillPayload {
    #[serde(default)]
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendationPayload {
    #[serde(default)]
    recommendations: Vec<String>,
}

/// Ollama-compatible `/api/generate` client.
pub struct OllamaSkillAnalyzer {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaSkillAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    fn build_prompt(description: &str) -> String {
        let description: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!(
            r#"Extract the technical and professional skills required by this job posting.

JOB DESCRIPTION:
{}

Respond with JSON only, in exactly this shape:
{{"skills": ["skill one", "skill two"]}}

List each skill once, as a short noun phrase (for example "python", "docker", "rest apis").
Do not include soft skills, years of experience, degrees or benefits."#,
            description
        )
    }

    fn build_recommendation_prompt(user_skills: &[String], missing_skills: &[String]) -> String {
        format!(
            r#"A candidate wants to move into a role that asks for skills they do not have yet.

CURRENT SKILLS: {}
MISSING SKILLS: {}

Suggest concrete next steps to learn the missing skills, most valuable first.
Respond with JSON only, in exactly this shape:
{{"recommendations": ["step one", "step two"]}}

Keep each step to one sentence and give at most 8 steps."#,
            user_skills.join(", "),
            missing_skills.join(", ")
        )
    }

    /// Runs one non-streaming generation and returns the raw model text.
    async fn generate(&self, prompt: String) -> Result<String, AnalysisError> {
        let url = format!("{}{}", self.base_url, GENERATE_ENDPOINT);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        debug!(url = %url, model = %self.model, "Requesting generation");

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Analysis service error {}: {}", status, body);
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Malformed(e.to_string()))?;
        Ok(generated.response)
    }
}

#[async_trait]
impl SkillAnalyzer for OllamaSkillAnalyzer {
    async fn analyze_description(&self, text: &str) -> Result<BTreeSet<String>, AnalysisError> {
        let raw = self.generate(Self::build_prompt(text)).await?;
        let skills = parse_skill_response(&raw)?;
        info!(skills = skills.len(), "Received skill analysis");
        Ok(skills)
    }

    async fn recommend(
        &self,
        user_skills: &[String],
        missing_skills: &[String],
    ) -> Result<Vec<String>, AnalysisError> {
        let raw = self
            .generate(Self::build_recommendation_prompt(user_skills, missing_skills))
            .await?;
        let recommendations = parse_recommendation_response(&raw)?;
        info!(
            recommendations = recommendations.len(),
            "Received learning recommendations"
        );
        Ok(recommendations)
    }
}

/// Deserializes the JSON object in `raw`, whole or embedded in prose.
fn parse_embedded<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str::<T>(raw).ok().or_else(|| {
        let start = raw.find('{')?;
        let end = raw.rfind('}')?;
        (start < end)
            .then(|| serde_json::from_str::<T>(&raw[start..=end]).ok())
            .flatten()
    })
}

fn malformed(raw: &str, what: &str) -> AnalysisError {
    let preview: String = raw.chars().take(120).collect();
    AnalysisError::Malformed(format!("no {} JSON in response: {}", what, preview))
}

/// Reads `{"skills": [...]}` out of model output, tolerating prose around it.
pub fn parse_skill_response(raw: &str) -> Result<BTreeSet<String>, AnalysisError> {
    let trimmed = raw.trim();

    let payload = parse_embedded::<SkillPayload>(trimmed)
        .or_else(|| {
            serde_json::from_str::<Vec<String>>(trimmed)
                .ok()
                .map(|skills| SkillPayload { skills })
        })
        .ok_or_else(|| malformed(trimmed, "skills"))?;

    Ok(payload
        .skills
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Reads `{"recommendations": [...]}`, keeping the model's order.
pub fn parse_recommendation_response(raw: &str) -> Result<Vec<String>, AnalysisError> {
    let trimmed = raw.trim();

    let payload = parse_embedded::<RecommendationPayload>(trimmed)
        .or_else(|| {
            serde_json::from_str::<Vec<String>>(trimmed)
                .ok()
                .map(|recommendations| RecommendationPayload { recommendations })
        })
        .ok_or_else(|| malformed(trimmed, "recommendations"))?;

    Ok(payload
        .recommendations
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
