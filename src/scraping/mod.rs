// src/scraping/mod.rs
//! Authenticated job-site scraping: login, paginated search, detail extraction
//! and the pipeline that ties them to the skill corpus.

pub mod extractor;
pub mod navigator;
pub mod pipeline;
pub mod selectors;
pub mod session;
pub mod types;

pub use extractor::ListingExtractor;
pub use navigator::{ResultPager, SearchNavigator};
pub use pipeline::{ScrapePipeline, ScrapeReport, ScrapeStage};
pub use session::{Session, SessionManager};
pub use types::{Credentials, JobListing, ListingHandle, SearchQuery};
