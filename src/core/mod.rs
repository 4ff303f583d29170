// src/core/mod.rs
//! Configuration and file system services shared across the crate

pub mod config_manager;
pub mod fs_ops;

pub use config_manager::{AnalysisConfig, ConfigManager, ScraperConfig};
pub use fs_ops::FsOps;
