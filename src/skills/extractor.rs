// src/skills/extractor.rs
use super::analysis_client::SkillAnalyzer;
use super::types::SkillSet;
use crate::scraping::JobListing;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Merged skills plus how many descriptions contributed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillExtraction {
    pub skills: SkillSet,
    pub analyzed: usize,
    pub skipped: usize,
}

pub struct SkillExtractor {
    analyzer: Arc<dyn SkillAnalyzer>,
}

impl SkillExtractor {
    pub fn new(analyzer: Arc<dyn SkillAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Analyzes each described listing in turn.
    ///
    /// A failed analysis drops that listing's contribution only.
    pub async fn extract_skills(&self, listings: &[JobListing]) -> SkillExtraction {
        let mut extraction = SkillExtraction::default();

        for (index, listing) in listings.iter().enumerate() {
            if !listing.has_description() {
                continue;
            }

            match self.analyzer.analyze_description(&listing.description).await {
                Ok(found) => {
                    extraction.analyzed += 1;
                    for skill in &found {
                        extraction.skills.insert(skill);
                    }
                }
                Err(e) => {
                    extraction.skipped += 1;
                    warn!(
                        listing = index,
                        title = %listing.title,
                        "Skipping listing, skill analysis failed: {}",
                        e
                    );
                }
            }
        }

        info!(
            skills = extraction.skills.len(),
            analyzed = extraction.analyzed,
            skipped = extraction.skipped,
            "Skill extraction finished"
        );
        extraction
    }
}
