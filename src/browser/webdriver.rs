// src/browser/webdriver.rs
use super::{BrowserDriver, BrowserError, BrowserLauncher};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

/// Connects to a running WebDriver endpoint (chromedriver, geckodriver, ...).
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(webdriver_url: String, headless: bool) -> Self {
        Self {
            webdriver_url,
            headless,
        }
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut args = vec![
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--window-size=1366,900",
        ];
        if self.headless {
            args.push("--headless=new");
        }

        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>, BrowserError> {
        info!(
            webdriver = %self.webdriver_url,
            headless = self.headless,
            "Opening WebDriver session"
        );

        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| {
                BrowserError::Launch(format!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url, e
                ))
            })?;

        Ok(Box::new(WebDriverBrowser {
            client: Some(client),
        }))
    }
}

pub struct WebDriverBrowser {
    client: Option<Client>,
}

impl WebDriverBrowser {
    fn client(&self) -> Result<&Client, BrowserError> {
        self.client
            .as_ref()
            .ok_or_else(|| BrowserError::Command("browser session already closed".to_string()))
    }
}

#[async_trait]
impl BrowserDriver for WebDriverBrowser {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!(url, "Navigating");
        self.client()?
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        self.client()?
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(|e| BrowserError::Command(format!("current_url failed: {}", e)))
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        self.client()?
            .source()
            .await
            .map_err(|e| BrowserError::Command(format!("page source failed: {}", e)))
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let element_error = |e: fantoccini::error::CmdError| BrowserError::Element {
            selector: selector.to_string(),
            message: e.to_string(),
        };

        let element = self
            .client()?
            .find(Locator::Css(selector))
            .await
            .map_err(element_error)?;
        element.clear().await.map_err(element_error)?;
        element.send_keys(value).await.map_err(element_error)
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element_error = |e: fantoccini::error::CmdError| BrowserError::Element {
            selector: selector.to_string(),
            message: e.to_string(),
        };

        self.client()?
            .find(Locator::Css(selector))
            .await
            .map_err(element_error)?
            .click()
            .await
            .map_err(element_error)
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BrowserError::Command(format!("Failed to close session: {}", e)))?;
            info!("WebDriver session closed");
        } else {
            warn!("WebDriver session close requested twice");
        }
        Ok(())
    }
}
