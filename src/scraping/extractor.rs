// src/scraping/extractor.rs
use super::selectors::{matches_any, ListingStrategies};
use super::session::Session;
use super::types::{JobListing, ListingHandle};
use crate::browser::wait_until;
use scraper::Html;
use tracing::{info, warn};

/// Reads title, company and description from listing detail pages.
#[derive(Debug, Clone, Default)]
pub struct ListingExtractor {
    strategies: ListingStrategies,
}

impl ListingExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategies(strategies: ListingStrategies) -> Self {
        Self { strategies }
    }

    /// Never fails: anything that cannot be read comes back as an empty field.
    pub async fn extract(&self, session: &mut Session, handle: &ListingHandle) -> JobListing {
        let config = session.config().clone();

        if let Err(e) = session.driver().goto(&handle.detail_url).await {
            warn!(job_id = %handle.job_id, "Detail page failed to load: {}", e);
            return JobListing::default();
        }

        let description_selectors = self.strategies.description.selectors;
        let rendered = wait_until(
            session.driver(),
            config.listing_timeout,
            config.poll_interval,
            |page| {
                let document = Html::parse_document(&page.source);
                matches_any(&document, description_selectors).then(|| self.read_fields(&document))
            },
        )
        .await;

        let listing = match rendered {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                warn!(
                    job_id = %handle.job_id,
                    timeout_secs = config.listing_timeout.as_secs_f32(),
                    "Description did not render in time"
                );
                self.read_current(session).await
            }
            Err(e) => {
                warn!(job_id = %handle.job_id, "Detail page could not be read: {}", e);
                JobListing::default()
            }
        };

        if !listing.has_description() {
            warn!(job_id = %handle.job_id, title = %listing.title, "Listing has no description");
        }
        listing
    }

    /// Extracts every handle in order; one result per handle.
    pub async fn extract_all(
        &self,
        session: &mut Session,
        handles: &[ListingHandle],
    ) -> Vec<JobListing> {
        let mut listings = Vec::with_capacity(handles.len());
        for (index, handle) in handles.iter().enumerate() {
            let listing = self.extract(session, handle).await;
            info!(
                progress = %format!("{}/{}", index + 1, handles.len()),
                job_id = %handle.job_id,
                title = %listing.title,
                company = %listing.company,
                "Extracted listing"
            );
            listings.push(listing);
        }
        listings
    }

    /// Whatever fields the page shows right now.
    async fn read_current(&self, session: &mut Session) -> JobListing {
        match session.driver().page_source().await {
            Ok(source) => self.read_fields(&Html::parse_document(&source)),
            Err(e) => {
                warn!("Could not read page source: {}", e);
                JobListing::default()
            }
        }
    }

    fn read_fields(&self, document: &Html) -> JobListing {
        JobListing {
            title: self.strategies.title.extract(document),
            company: self.strategies.company.extract(document),
            description: self.strategies.description.extract(document),
        }
    }
}
