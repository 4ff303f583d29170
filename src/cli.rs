// src/cli.rs
use crate::browser::WebDriverLauncher;
use crate::core::ConfigManager;
use crate::scraping::{Credentials, ScrapePipeline, SearchQuery, SessionManager};
use crate::skills::{
    aggregate_for_role, OllamaSkillAnalyzer, SkillAdvisor, SkillAnalyzer, SkillExtractor,
    SkillStore,
};
use crate::web::{start_web_server, AppState};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "skillgap")]
#[command(about = "Scrape job listings for a role and compare their skills with yours")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Scrape listings once and print the report as JSON
    Scrape {
        #[arg(long)]
        role: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the stored skills for a role
    Skills { role: String },
    /// Compare your skills with the stored skills for a role
    Analyze {
        #[arg(long)]
        role: String,
        #[arg(long = "skill")]
        skills: Vec<String>,
    },
}

pub fn build_analyzer(config: &ConfigManager) -> Result<Arc<dyn SkillAnalyzer>> {
    Ok(Arc::new(OllamaSkillAnalyzer::new(&config.analysis)?))
}

/// Wires the WebDriver browser, the analysis client and the corpus store.
pub fn build_pipeline(
    config: &ConfigManager,
    analyzer: Arc<dyn SkillAnalyzer>,
) -> ScrapePipeline {
    let launcher = Arc::new(WebDriverLauncher::new(
        config.scraper.webdriver_url.clone(),
        config.scraper.headless,
    ));
    let store = Arc::new(SkillStore::new(config.environment.corpus_path.clone()));

    ScrapePipeline::new(
        SessionManager::new(launcher, config.scraper.clone()),
        SkillExtractor::new(analyzer),
        store,
    )
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    let command = cli.command.unwrap_or(Command::Serve { port: None });

    match command {
        Command::Serve { port } => {
            let analyzer = build_analyzer(&config)?;
            let pipeline = build_pipeline(&config, analyzer.clone());
            let state = AppState::new(
                pipeline,
                SkillAdvisor::new(analyzer),
                config.scraper.default_limit,
            );
            start_web_server(state, port.unwrap_or(config.server.port)).await
        }

        Command::Scrape {
            role,
            location,
            limit,
        } => {
            let query = SearchQuery::new(
                &role,
                &location,
                limit.unwrap_or(config.scraper.default_limit),
            )?;
            let credentials = Credentials::from_env()?;
            let pipeline = build_pipeline(&config, build_analyzer(&config)?);

            let report = pipeline.scrape(&credentials, query).await?;
            info!(
                listings = report.listings.len(),
                skills = report.skills.len(),
                "Scrape finished"
            );
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
            Ok(())
        }

        Command::Skills { role } => {
            let store = SkillStore::new(config.environment.corpus_path.clone());
            let skills = store.get(&role).await?;
            for skill in skills.iter() {
                println!("{}", skill);
            }
            Ok(())
        }

        Command::Analyze { role, skills } => {
            let store = SkillStore::new(config.environment.corpus_path.clone());
            let corpus = store.load().await?;
            let gap = aggregate_for_role(&skills, &corpus, &role)?;
            let report = SkillAdvisor::new(build_analyzer(&config)?)
                .advise(&skills, gap)
                .await;
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize result")?;
            println!("{}", json);
            Ok(())
        }
    }
}
