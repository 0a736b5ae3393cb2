use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::download::DEFAULT_CONCURRENCY;
use crate::fetcher::DEFAULT_BASE_URL;

/// Runtime settings. Environment overrides use the `FACULTY_` prefix
/// (`FACULTY_BASE_URL`, `FACULTY_CONCURRENCY`, `FACULTY_TIMEOUT_SECS`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub concurrency: usize,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(
            Environment::with_prefix("FACULTY").try_parsing(true),
        ))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("concurrency", DEFAULT_CONCURRENCY as i64)?
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    /// `None` means requests wait indefinitely.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
