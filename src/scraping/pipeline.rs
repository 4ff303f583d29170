// src/scraping/pipeline.rs
use super::extractor::ListingExtractor;
use super::navigator::SearchNavigator;
use super::session::SessionManager;
use super::types::{Credentials, JobListing, SearchQuery};
use crate::error::ScrapeError;
use crate::skills::{SkillExtractor, SkillSet, SkillStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStage {
    Idle,
    Authenticating,
    Authenticated,
    Searching,
    Extracting,
    Persisting,
    Done,
    Failed,
}

impl ScrapeStage {
    /// Only login and the first search page may fail the whole scrape.
    pub fn can_transition_to(self, next: ScrapeStage) -> bool {
        use ScrapeStage::*;
        matches!(
            (self, next),
            (Idle, Authenticating)
                | (Authenticating, Authenticated)
                | (Authenticating, Failed)
                | (Authenticated, Searching)
                | (Searching, Extracting)
                | (Searching, Failed)
                | (Extracting, Persisting)
                | (Persisting, Done)
        )
    }
}

impl fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScrapeStage::Idle => "idle",
            ScrapeStage::Authenticating => "authenticating",
            ScrapeStage::Authenticated => "authenticated",
            ScrapeStage::Searching => "searching",
            ScrapeStage::Extracting => "extracting",
            ScrapeStage::Persisting => "persisting",
            ScrapeStage::Done => "done",
            ScrapeStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

struct StageTracker {
    stage: ScrapeStage,
    role: String,
}

impl StageTracker {
    fn new(role: &str) -> Self {
        Self {
            stage: ScrapeStage::Idle,
            role: role.to_string(),
        }
    }

    fn advance(&mut self, next: ScrapeStage) {
        if !self.stage.can_transition_to(next) {
            warn!(from = %self.stage, to = %next, "Unexpected scrape stage transition");
        }
        info!(role = %self.role, from = %self.stage, to = %next, "Scrape stage");
        self.stage = next;
    }

    fn fail(&mut self, err: &ScrapeError) {
        error!(role = %self.role, stage = %self.stage, code = err.code(), "Scrape failed: {}", err);
        self.advance(ScrapeStage::Failed);
    }
}

/// Outcome of one scrape run.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub role: String,
    pub location: String,
    pub listings: Vec<JobListing>,
    pub skills: SkillSet,
    pub empty_descriptions: usize,
    pub skipped_analyses: usize,
    /// False when no description could be analyzed and the corpus was left as is.
    pub persisted: bool,
    pub stage: ScrapeStage,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Login → search → extract → analyze → persist, for one role and location.
pub struct ScrapePipeline {
    sessions: SessionManager,
    navigator: SearchNavigator,
    listings: ListingExtractor,
    skills: SkillExtractor,
    store: Arc<SkillStore>,
}

impl ScrapePipeline {
    pub fn new(sessions: SessionManager, skills: SkillExtractor, store: Arc<SkillStore>) -> Self {
        Self {
            sessions,
            navigator: SearchNavigator::new(),
            listings: ListingExtractor::new(),
            skills,
            store,
        }
    }

    pub fn with_listing_extractor(mut self, listings: ListingExtractor) -> Self {
        self.listings = listings;
        self
    }

    pub fn store(&self) -> &Arc<SkillStore> {
        &self.store
    }

    /// Runs one scrape.
    ///
    /// Fails on login, on the first search page, or when the corpus cannot be
    /// written. Missing fields and failed analyses only shrink the result.
    pub async fn scrape(
        &self,
        credentials: &Credentials,
        query: SearchQuery,
    ) -> Result<ScrapeReport, ScrapeError> {
        let started_at = Utc::now();
        let mut stages = StageTracker::new(query.role());

        stages.advance(ScrapeStage::Authenticating);
        let mut session = match self.sessions.login(credentials).await {
            Ok(session) => session,
            Err(e) => {
                stages.fail(&e);
                return Err(e);
            }
        };
        stages.advance(ScrapeStage::Authenticated);

        stages.advance(ScrapeStage::Searching);
        let handles = match self.navigator.search(&mut session, &query).await {
            Ok(handles) => handles,
            Err(e) => {
                session.close().await;
                stages.fail(&e);
                return Err(e);
            }
        };

        stages.advance(ScrapeStage::Extracting);
        let listings = self.listings.extract_all(&mut session, &handles).await;
        session.close().await;

        let empty_descriptions = listings.iter().filter(|l| !l.has_description()).count();
        let extraction = self.skills.extract_skills(&listings).await;

        stages.advance(ScrapeStage::Persisting);
        let persisted = if extraction.analyzed > 0 {
            if let Err(e) = self.store.persist(query.role(), &extraction.skills).await {
                error!(
                    role = query.role(),
                    "Skill corpus not updated, previous entry kept: {}", e
                );
                return Err(e);
            }
            true
        } else {
            warn!(
                role = query.role(),
                listings = listings.len(),
                "No description was analyzed, keeping the previous corpus entry"
            );
            false
        };
        stages.advance(ScrapeStage::Done);

        Ok(ScrapeReport {
            role: query.role().to_string(),
            location: query.location().to_string(),
            listings,
            skills: extraction.skills,
            empty_descriptions,
            skipped_analyses: extraction.skipped,
            persisted,
            stage: stages.stage,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
