// src/skills/advisor.rs
use super::aggregator::AggregationResult;
use super::analysis_client::SkillAnalyzer;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Skill gap plus learning recommendations for the missing side.
#[derive(Debug, Clone, Serialize)]
pub struct SkillGapReport {
    #[serde(flatten)]
    pub gap: AggregationResult,
    pub recommendations: Vec<String>,
}

/// Asks the analysis service how to close a skill gap.
pub struct SkillAdvisor {
    analyzer: Arc<dyn SkillAnalyzer>,
}

impl SkillAdvisor {
    pub fn new(analyzer: Arc<dyn SkillAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Never fails: an unreachable or confused model yields no recommendations.
    pub async fn advise<S: AsRef<str>>(
        &self,
        user_skills: &[S],
        gap: AggregationResult,
    ) -> SkillGapReport {
        if gap.missing.is_empty() {
            debug!("No missing skills, skipping recommendations");
            return SkillGapReport {
                gap,
                recommendations: Vec::new(),
            };
        }

        let user: Vec<String> = user_skills
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let missing: Vec<String> = gap.missing.iter().cloned().collect();

        let recommendations = match self.analyzer.recommend(&user, &missing).await {
            Ok(recommendations) => recommendations,
            Err(e) => {
                warn!(missing = missing.len(), "Recommendations unavailable: {}", e);
                Vec::new()
            }
        };

        SkillGapReport {
            gap,
            recommendations,
        }
    }
}
