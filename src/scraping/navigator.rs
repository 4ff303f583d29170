// src/scraping/navigator.rs
use super::selectors::{
    matches_any, JOB_CARD_IDS, NEXT_PAGE_CONTROLS, NO_RESULTS_INDICATORS, RESULTS_CONTAINERS,
};
use super::session::Session;
use super::types::{ListingHandle, SearchQuery};
use crate::browser::wait_until;
use crate::error::ScrapeError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Builds the search URL for one result page.
pub fn search_url(
    site_url: &str,
    role: &str,
    location: &str,
    offset: usize,
) -> Result<String, ScrapeError> {
    let mut url = url::Url::parse(&format!("{}/jobs/search/", site_url))
        .map_err(|e| ScrapeError::Navigation(format!("invalid site URL {}: {}", site_url, e)))?;
    url.query_pairs_mut()
        .append_pair("keywords", role)
        .append_pair("location", location)
        .append_pair("start", &offset.to_string());
    Ok(url.into())
}

pub fn detail_url(site_url: &str, job_id: &str) -> String {
    format!("{}/jobs/view/{}/", site_url, job_id)
}

/// What a rendered result page contains.
#[derive(Debug, Default)]
struct PageScan {
    container: bool,
    no_results: bool,
    job_ids: Vec<String>,
    has_next: bool,
}

fn scan_results(source: &str) -> PageScan {
    let document = Html::parse_document(source);
    let mut seen = HashSet::new();
    let mut job_ids = Vec::new();

    for &(selector_str, attribute) in JOB_CARD_IDS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(raw) = element.value().attr(attribute) else {
                continue;
            };
            let id = raw.rsplit(':').next().unwrap_or(raw).trim();
            if !id.is_empty() && seen.insert(id.to_string()) {
                job_ids.push(id.to_string());
            }
        }
    }

    PageScan {
        container: matches_any(&document, RESULTS_CONTAINERS),
        no_results: matches_any(&document, NO_RESULTS_INDICATORS),
        job_ids,
        has_next: matches_any(&document, NEXT_PAGE_CONTROLS),
    }
}

/// Lazily walks result pages, one page per [`ResultPager::next_page`] call.
pub struct ResultPager {
    query: SearchQuery,
    page: usize,
    exhausted: bool,
    seen: HashSet<String>,
}

impl ResultPager {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            page: 0,
            exhausted: false,
            seen: HashSet::new(),
        }
    }

    /// Handles from the next page, or `None` once results run out.
    ///
    /// Only the first page can fail; later pages that do not load, render or
    /// read end the walk instead.
    pub async fn next_page(
        &mut self,
        session: &mut Session,
    ) -> Result<Option<Vec<ListingHandle>>, ScrapeError> {
        if self.exhausted {
            return Ok(None);
        }

        let config = session.config().clone();
        let first_page = self.page == 0;
        let url = search_url(
            &config.site_url,
            self.query.role(),
            self.query.location(),
            self.page * config.page_size,
        )?;
        info!(page = self.page + 1, url = %url, "Loading search results");

        if let Err(e) = session.driver().goto(&url).await {
            if first_page {
                return Err(ScrapeError::Navigation(format!(
                    "first search page failed to load: {}",
                    e
                )));
            }
            warn!(page = self.page + 1, "Search page failed to load, stopping: {}", e);
            return Ok(self.finish());
        }

        let mut container_seen = false;
        let scan = wait_until(
            session.driver(),
            config.page_timeout,
            config.poll_interval,
            |page| {
                let scan = scan_results(&page.source);
                container_seen |= scan.container;
                (!scan.job_ids.is_empty() || scan.no_results).then_some(scan)
            },
        )
        .await;

        let scan = match scan {
            Ok(scan) => scan,
            Err(e) if first_page => {
                return Err(ScrapeError::Navigation(format!(
                    "first search page could not be read: {}",
                    e
                )));
            }
            Err(e) => {
                warn!(page = self.page + 1, "Search page could not be read, stopping: {}", e);
                return Ok(self.finish());
            }
        };

        let scan = match scan {
            Some(scan) => scan,
            None if container_seen => PageScan::default(),
            None if first_page => {
                return Err(ScrapeError::Navigation(
                    "search results did not render on the first page".to_string(),
                ));
            }
            None => {
                warn!(page = self.page + 1, "Search page timed out, treating as end of results");
                return Ok(self.finish());
            }
        };

        let batch: Vec<ListingHandle> = scan
            .job_ids
            .into_iter()
            .filter(|id| self.seen.insert(id.clone()))
            .map(|id| ListingHandle {
                detail_url: detail_url(&config.site_url, &id),
                job_id: id,
                page: self.page + 1,
            })
            .collect();

        if batch.is_empty() {
            info!(page = self.page + 1, "Page rendered no new listings, stopping");
            return Ok(self.finish());
        }

        debug!(
            page = self.page + 1,
            listings = batch.len(),
            has_next = scan.has_next,
            "Collected listing handles"
        );
        self.page += 1;
        if !scan.has_next {
            self.exhausted = true;
        }
        Ok(Some(batch))
    }

    fn finish(&mut self) -> Option<Vec<ListingHandle>> {
        self.exhausted = true;
        None
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SearchNavigator;

impl SearchNavigator {
    pub fn new() -> Self {
        Self
    }

    /// Collects at most `query.limit()` handles across result pages.
    pub async fn search(
        &self,
        session: &mut Session,
        query: &SearchQuery,
    ) -> Result<Vec<ListingHandle>, ScrapeError> {
        let mut pager = ResultPager::new(query.clone());
        let mut handles = Vec::new();

        while handles.len() < query.limit() {
            match pager.next_page(session).await? {
                Some(batch) => handles.extend(batch),
                None => break,
            }
        }
        handles.truncate(query.limit());

        info!(
            role = query.role(),
            location = query.location(),
            found = handles.len(),
            limit = query.limit(),
            "Search finished"
        );
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{results_page, scraper_config, FakeSite, SITE_URL};
    use crate::scraping::session::SessionManager;
    use crate::scraping::types::Credentials;

    async fn open_session(site: &FakeSite) -> Session {
        SessionManager::new(site.launcher(), scraper_config())
            .login(&Credentials::new("user@example.com", "hunter2"))
            .await
            .unwrap()
    }

    fn page_url(page: usize) -> String {
        search_url(SITE_URL, "backend developer", "New York", page * 25).unwrap()
    }

    fn query(limit: usize) -> SearchQuery {
        SearchQuery::new("backend developer", "New York", limit).unwrap()
    }

    #[test]
    fn test_search_url_encodes_role_and_location() {
        let url = search_url(SITE_URL, "c++ developer", "São Paulo", 25).unwrap();
        assert!(url.starts_with("https://jobs.test/jobs/search/?"));
        assert!(url.contains("keywords=c%2B%2B+developer"));
        assert!(url.contains("start=25"));
    }

    #[test]
    fn test_scan_reads_ids_from_urn_attributes() {
        let scan = scan_results(
            r#"<ul class="jobs-search__results-list">
                 <div class="base-card" data-entity-urn="urn:li:jobPosting:4242"></div>
               </ul>"#,
        );
        assert!(scan.container);
        assert_eq!(scan.job_ids, vec!["4242".to_string()]);
        assert!(!scan.has_next);
    }

    #[test]
    fn test_disabled_next_button_is_last_page() {
        let scan = scan_results(
            r#"<div class="jobs-search-results-list">
                 <li data-occludable-job-id="7"></li>
                 <button aria-label="View next page" class="jobs-search-pagination__button--next" disabled>Next</button>
               </div>"#,
        );
        assert_eq!(scan.job_ids, vec!["7".to_string()]);
        assert!(!scan.has_next);
    }

    #[tokio::test]
    async fn test_search_stops_at_limit_across_pages() {
        let site = FakeSite::new(SITE_URL);
        site.add_page(&page_url(0), &results_page(&[1, 2, 3], true));
        site.add_page(&page_url(1), &results_page(&[4, 5, 6], true));
        site.add_page(&page_url(2), &results_page(&[7, 8, 9], false));
        let mut session = open_session(&site).await;

        let handles = SearchNavigator::new()
            .search(&mut session, &query(5))
            .await
            .unwrap();

        let ids: Vec<_> = handles.iter().map(|h| h.job_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(handles[3].page, 2);
        assert_eq!(handles[0].detail_url, "https://jobs.test/jobs/view/1/");
        assert!(!site.visits().contains(&page_url(2)));
    }

    #[tokio::test]
    async fn test_fewer_results_than_limit_returns_all_without_error() {
        let site = FakeSite::new(SITE_URL);
        site.add_page(&page_url(0), &results_page(&[1, 2], true));
        site.add_page(&page_url(1), &results_page(&[3], false));
        let mut session = open_session(&site).await;

        let handles = SearchNavigator::new()
            .search(&mut session, &query(10))
            .await
            .unwrap();

        assert_eq!(handles.len(), 3);
    }

    #[tokio::test]
    async fn test_later_page_timeout_keeps_partial_results() {
        let site = FakeSite::new(SITE_URL);
        site.add_page(&page_url(0), &results_page(&[1, 2], true));
        let mut session = open_session(&site).await;

        let handles = SearchNavigator::new()
            .search(&mut session, &query(10))
            .await
            .unwrap();

        assert_eq!(handles.len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_later_page_keeps_partial_results() {
        let site = FakeSite::new(SITE_URL);
        site.add_page(&page_url(0), &results_page(&[1, 2, 3], true));
        site.add_page(&page_url(1), &results_page(&[4, 5], false));
        site.fail_source_on("start=25");
        let mut session = open_session(&site).await;

        let handles = SearchNavigator::new()
            .search(&mut session, &query(10))
            .await
            .unwrap();

        let ids: Vec<_> = handles.iter().map(|h| h.job_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_unreadable_first_page_is_a_navigation_error() {
        let site = FakeSite::new(SITE_URL);
        site.add_page(&page_url(0), &results_page(&[1, 2], true));
        site.fail_source_on("start=0");
        let mut session = open_session(&site).await;

        let err = SearchNavigator::new()
            .search(&mut session, &query(10))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ScrapeError::Navigation(_)));
    }

    #[tokio::test]
    async fn test_first_page_timeout_is_a_navigation_error() {
        let site = FakeSite::new(SITE_URL);
        let mut session = open_session(&site).await;

        let err = SearchNavigator::new()
            .search(&mut session, &query(10))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ScrapeError::Navigation(_)));
    }

    #[tokio::test]
    async fn test_rendered_empty_first_page_returns_no_handles() {
        let site = FakeSite::new(SITE_URL);
        site.add_page(
            &page_url(0),
            r#"<div class="jobs-search-results-list"><div class="jobs-search-no-results-banner">No matching jobs</div></div>"#,
        );
        let mut session = open_session(&site).await;

        let handles = SearchNavigator::new()
            .search(&mut session, &query(10))
            .await
            .unwrap();

        assert!(handles.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_page_ends_pagination() {
        let site = FakeSite::new(SITE_URL);
        site.add_page(&page_url(0), &results_page(&[1, 2], true));
        site.add_page(&page_url(1), &results_page(&[1, 2], true));
        let mut session = open_session(&site).await;

        let handles = SearchNavigator::new()
            .search(&mut session, &query(10))
            .await
            .unwrap();

        assert_eq!(handles.len(), 2);
        assert!(!site.visits().contains(&page_url(2)));
    }
}
