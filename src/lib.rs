// src/lib.rs
//! Job-market skill gap analysis: scrape listings for a role, extract the
//! skills they ask for, and compare them with what a user already knows.

pub mod browser;
pub mod cli;
pub mod core;
pub mod error;
pub mod scraping;
pub mod skills;
pub mod web;

pub use error::{AnalysisError, AuthFailure, ScrapeError};
pub use scraping::{Credentials, JobListing, ScrapePipeline, ScrapeReport, SearchQuery};
pub use skills::{aggregate, aggregate_for_role, AggregationResult, Corpus, SkillSet, SkillStore};
pub use web::{start_web_server, AppState};
