// src/core/config_manager.rs
//! Unified configuration: environment defaults, optional `config.yaml` overlay,
//! then individual environment variable overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub scraper: ScraperConfig,
    pub analysis: AnalysisConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub name: String,
    pub corpus_path: PathBuf,
    pub log_path: PathBuf,
}

/// Site and timing settings for one scrape.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub site_url: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub default_limit: usize,
    pub page_size: usize,
    pub login_timeout: Duration,
    pub page_timeout: Duration,
    pub listing_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site_url: "https://www.linkedin.com".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            default_limit: 10,
            page_size: 25,
            login_timeout: Duration::from_secs(20),
            page_timeout: Duration::from_secs(15),
            listing_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub api_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Optional per-environment overrides read from `config.yaml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileOverrides,
    #[serde(default)]
    production: FileOverrides,
}

#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    corpus_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    site_url: Option<String>,
    webdriver_url: Option<String>,
    headless: Option<bool>,
    default_limit: Option<usize>,
    login_timeout_secs: Option<u64>,
    page_timeout_secs: Option<u64>,
    listing_timeout_secs: Option<u64>,
    analysis_url: Option<String>,
    analysis_model: Option<String>,
    analysis_timeout_secs: Option<u64>,
    port: Option<u16>,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let env_name = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading configuration for environment: {}", env_name);

        let base_dir = if env_name == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        let overrides = Self::load_file(&base_dir.join(CONFIG_FILE), &env_name)?;
        let config = Self::from_overrides(env_name, &base_dir, overrides)?;
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path, env_name: &str) -> Result<FileOverrides> {
        if !path.exists() {
            return Ok(FileOverrides::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Applied configuration overlay from {}", path.display());
        Ok(match env_name {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn from_overrides(env_name: String, base_dir: &Path, file: FileOverrides) -> Result<Self> {
        let scraper_defaults = ScraperConfig::default();
        let analysis_defaults = AnalysisConfig::default();

        let corpus_path = env_var("SKILLGAP_CORPUS_PATH")
            .map(PathBuf::from)
            .or(file.corpus_path)
            .unwrap_or_else(|| PathBuf::from("job_skills.json"));
        let log_path = env_var("SKILLGAP_LOG_FILE")
            .map(PathBuf::from)
            .or(file.log_path)
            .unwrap_or_else(|| PathBuf::from("/tmp/skillgap.log"));

        let secs = |var: &str, from_file: Option<u64>, default: Duration| -> Result<Duration> {
            Ok(parse_env::<u64>(var)?
                .or(from_file)
                .map(Duration::from_secs)
                .unwrap_or(default))
        };

        let scraper = ScraperConfig {
            site_url: env_var("SKILLGAP_SITE_URL")
                .or(file.site_url)
                .unwrap_or(scraper_defaults.site_url)
                .trim_end_matches('/')
                .to_string(),
            webdriver_url: env_var("WEBDRIVER_URL")
                .or(file.webdriver_url)
                .unwrap_or(scraper_defaults.webdriver_url),
            headless: parse_env::<bool>("BROWSER_HEADLESS")?
                .or(file.headless)
                .unwrap_or(scraper_defaults.headless),
            default_limit: parse_env::<usize>("SCRAPE_DEFAULT_LIMIT")?
                .or(file.default_limit)
                .unwrap_or(scraper_defaults.default_limit),
            page_size: scraper_defaults.page_size,
            login_timeout: secs(
                "LOGIN_TIMEOUT_SECS",
                file.login_timeout_secs,
                scraper_defaults.login_timeout,
            )?,
            page_timeout: secs(
                "PAGE_TIMEOUT_SECS",
                file.page_timeout_secs,
                scraper_defaults.page_timeout,
            )?,
            listing_timeout: secs(
                "LISTING_TIMEOUT_SECS",
                file.listing_timeout_secs,
                scraper_defaults.listing_timeout,
            )?,
            poll_interval: scraper_defaults.poll_interval,
        };

        let analysis = AnalysisConfig {
            api_url: env_var("ANALYSIS_API_URL")
                .or(file.analysis_url)
                .unwrap_or(analysis_defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            model: env_var("ANALYSIS_MODEL")
                .or(file.analysis_model)
                .unwrap_or(analysis_defaults.model),
            timeout_seconds: parse_env::<u64>("ANALYSIS_TIMEOUT_SECS")?
                .or(file.analysis_timeout_secs)
                .unwrap_or(analysis_defaults.timeout_seconds),
        };

        let server = ServerConfig {
            port: parse_env::<u16>("ROCKET_PORT")?
                .or(file.port)
                .unwrap_or(8000),
        };

        Ok(Self {
            environment: EnvironmentConfig {
                name: env_name,
                corpus_path: resolve_path(base_dir, &corpus_path),
                log_path: resolve_path(base_dir, &log_path),
            },
            scraper,
            analysis,
            server,
        })
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.scraper.site_url)
            .with_context(|| format!("Invalid site URL: {}", self.scraper.site_url))?;
        url::Url::parse(&self.analysis.api_url)
            .with_context(|| format!("Invalid analysis API URL: {}", self.analysis.api_url))?;
        if self.scraper.default_limit == 0 {
            anyhow::bail!("SCRAPE_DEFAULT_LIMIT must be at least 1");
        }
        Ok(())
    }

    /// Ensure the corpus directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        if let Some(parent) = self.environment.corpus_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        None => Ok(None),
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
