// src/browser/fake.rs
//! In-memory job site used by the scraping tests.

use super::{BrowserDriver, BrowserError, BrowserLauncher};
use crate::core::ScraperConfig;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SITE_URL: &str = "https://jobs.test";

const BLANK_PAGE: &str = "<html><head></head><body></body></html>";

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum LoginBehavior {
    Normal,
    Challenge,
    NeverLands,
}

struct SiteState {
    pages: HashMap<String, String>,
    identifier: String,
    secret: String,
    login_behavior: LoginBehavior,
    launches: usize,
    closes: usize,
    visits: Vec<String>,
    unreadable: Vec<String>,
}

#[derive(Clone)]
pub struct FakeSite {
    base_url: String,
    state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn new(base_url: &str) -> Self {
        let site = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            state: Arc::new(Mutex::new(SiteState {
                pages: HashMap::new(),
                identifier: "user@example.com".to_string(),
                secret: "hunter2".to_string(),
                login_behavior: LoginBehavior::Normal,
                launches: 0,
                closes: 0,
                visits: Vec::new(),
                unreadable: Vec::new(),
            })),
        };
        site.add_page(&format!("{}/login", site.base_url), &login_page(None));
        site.add_page(
            &format!("{}/feed/", site.base_url),
            "<html><body><nav id='global-nav'>Home</nav></body></html>",
        );
        site
    }

    pub fn add_page(&self, url: &str, html: &str) {
        self.lock().pages.insert(url.to_string(), html.to_string());
    }

    /// Makes `page_source` fail on any URL containing `pattern`.
    pub fn fail_source_on(&self, pattern: &str) {
        self.lock().unreadable.push(pattern.to_string());
    }

    pub fn set_login_behavior(&self, behavior: LoginBehavior) {
        self.lock().login_behavior = behavior;
    }

    pub fn launches(&self) -> usize {
        self.lock().launches
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    pub fn visits(&self) -> Vec<String> {
        self.lock().visits.clone()
    }

    pub fn driver(&self) -> Box<dyn BrowserDriver> {
        Box::new(FakeBrowser {
            site: self.clone(),
            url: "about:blank".to_string(),
            source: BLANK_PAGE.to_string(),
            filled: HashMap::new(),
            closed: false,
        })
    }

    pub fn launcher(&self) -> Arc<dyn BrowserLauncher> {
        Arc::new(FakeLauncher { site: self.clone() })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SiteState> {
        self.state.lock().unwrap()
    }
}

struct FakeLauncher {
    site: FakeSite,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, BrowserError> {
        self.site.lock().launches += 1;
        Ok(self.site.driver())
    }
}

struct FakeBrowser {
    site: FakeSite,
    url: String,
    source: String,
    filled: HashMap<String, String>,
    closed: bool,
}

impl FakeBrowser {
    fn has_element(&self, selector: &str) -> bool {
        let Ok(selector) = Selector::parse(selector) else {
            return false;
        };
        Html::parse_document(&self.source)
            .select(&selector)
            .next()
            .is_some()
    }

    fn submit_login(&mut self) {
        let base = self.site.base_url.clone();
        let state = self.site.lock();
        let identifier = self.filled.get("#username").cloned().unwrap_or_default();
        let secret = self.filled.get("#password").cloned().unwrap_or_default();

        let (url, source) = match state.login_behavior {
            LoginBehavior::Challenge => (
                format!("{}/checkpoint/challenge/abc", base),
                "<html><body><div class='challenge-dialog'>Let's do a quick security check</div></body></html>"
                    .to_string(),
            ),
            LoginBehavior::NeverLands => (format!("{}/login-submit", base), BLANK_PAGE.to_string()),
            LoginBehavior::Normal if identifier == state.identifier && secret == state.secret => {
                let url = format!("{}/feed/", base);
                let source = state.pages.get(&url).cloned().unwrap_or_default();
                (url, source)
            }
            LoginBehavior::Normal => (
                format!("{}/login", base),
                login_page(Some("Wrong email or password. Try again.")),
            ),
        };
        drop(state);
        self.url = url;
        self.source = source;
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        if self.closed {
            return Err(BrowserError::Command("closed".to_string()));
        }
        let mut state = self.site.lock();
        state.visits.push(url.to_string());
        self.source = state
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| BLANK_PAGE.to_string());
        self.url = url.to_string();
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.url.clone())
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        let unreadable = self
            .site
            .lock()
            .unreadable
            .iter()
            .any(|pattern| self.url.contains(pattern.as_str()));
        if unreadable {
            return Err(BrowserError::Command("renderer crashed".to_string()));
        }
        Ok(self.source.clone())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        if !self.has_element(selector) {
            return Err(BrowserError::Element {
                selector: selector.to_string(),
                message: "no such element".to_string(),
            });
        }
        self.filled.insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        if !self.has_element(selector) {
            return Err(BrowserError::Element {
                selector: selector.to_string(),
                message: "no such element".to_string(),
            });
        }
        if self.url.ends_with("/login") {
            self.submit_login();
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if !self.closed {
            self.closed = true;
            self.site.lock().closes += 1;
        }
        Ok(())
    }
}

fn login_page(error: Option<&str>) -> String {
    format!(
        r#"<html><body>
<form class="login__form">
  <input id="username" name="session_key">
  <div id="error-for-username" class="form__label--error hidden__imp"></div>
  <input id="password" name="session_password" type="password">
  <div id="error-for-password" class="form__label--error">{}</div>
  <button type="submit" aria-label="Sign in">Sign in</button>
</form>
</body></html>"#,
        error.unwrap_or("")
    )
}

/// Search results page in the site's list markup.
pub fn results_page(job_ids: &[u32], has_next: bool) -> String {
    let cards: String = job_ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="jobs-search-results__list-item" data-occludable-job-id="{id}">
  <div class="job-card-container" data-job-id="{id}">
    <a class="job-card-list__title" href="/jobs/view/{id}/">Job {id}</a>
  </div>
</li>"#
            )
        })
        .collect();
    let next = if has_next {
        r#"<button aria-label="View next page" class="jobs-search-pagination__button--next">Next</button>"#
    } else {
        ""
    };
    format!(
        r#"<html><body><div class="jobs-search-results-list"><ul class="scaffold-layout__list-container">{cards}</ul>{next}</div></body></html>"#
    )
}

pub fn detail_page(title: &str, company: &str, description: &str) -> String {
    format!(
        r#"<html><body>
<div class="job-details-jobs-unified-top-card__job-title"><h1>{title}</h1></div>
<div class="job-details-jobs-unified-top-card__company-name"><a>{company}</a></div>
<article class="jobs-description__container">
  <div class="jobs-box__html-content">{description}</div>
</article>
</body></html>"#
    )
}

/// Scraper settings pointed at [`SITE_URL`] with short waits.
pub fn scraper_config() -> ScraperConfig {
    ScraperConfig {
        site_url: SITE_URL.to_string(),
        login_timeout: Duration::from_millis(40),
        page_timeout: Duration::from_millis(40),
        listing_timeout: Duration::from_millis(30),
        poll_interval: Duration::from_millis(5),
        ..ScraperConfig::default()
    }
}
