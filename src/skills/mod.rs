// src/skills/mod.rs
pub mod advisor;
pub mod aggregator;
pub mod analysis_client;
pub mod extractor;
pub mod store;
pub mod types;

pub use advisor::{SkillAdvisor, SkillGapReport};
pub use aggregator::{aggregate, aggregate_for_role, AggregationResult};
pub use analysis_client::{OllamaSkillAnalyzer, SkillAnalyzer};
pub use extractor::{SkillExtraction, SkillExtractor};
pub use store::SkillStore;
pub use types::{normalize_role, normalize_skill, Corpus, SkillSet};
