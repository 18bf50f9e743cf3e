/// `load_config` module: loads a static YAML config, applies environment overrides and
/// produces the settings the CLI hands to the aggregator.
///
/// This module is the only place where user-supplied YAML is parsed and mapped to
/// strongly-typed structs.
///
/// # Responsibilities
/// - Parse the YAML configuration file into [`CliConfig`]
/// - Apply environment overrides (`NINA_BASE_URL`)
/// - Produce clear diagnostics for CLI and tests on any failure
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use nina_warnings_core::config::WarnClientConfig;
use nina_warnings_core::{AggregateRequest, Source};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

pub const BASE_URL_ENV: &str = "NINA_BASE_URL";

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub warnings: WarnClientConfig,
    /// Sources in query order; empty means every source.
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub load_details: bool,
}

impl CliConfig {
    pub fn trace_loaded(&self) {
        info!(
            sources_count = self.sources.len(),
            load_details = self.load_details,
            "Loaded CliConfig"
        );
        self.warnings.trace_loaded();
        debug!(?self, "CliConfig loaded (full debug)");
    }

    pub fn aggregate_request(&self) -> AggregateRequest {
        AggregateRequest::default()
            .with_sources(self.sources.iter().copied())
            .with_details(self.load_details)
    }

    /// Replaces the base URL with `NINA_BASE_URL` when that variable is set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            info!(env = BASE_URL_ENV, base_url = %base_url, "Overriding base URL from environment");
            self.warnings.base_url = Some(base_url);
        }
    }
}

/// Loads a YAML config file and applies environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref)
        .map_err(|e| {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            e
        })
        .with_context(|| format!("Failed to read config file {:?}", path_ref))?;

    let mut config: CliConfig = serde_yaml::from_str(&config_content)
        .map_err(|e| {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            e
        })
        .context("Failed to parse config YAML")?;
    info!(config_path = ?path_ref, "Parsed config YAML successfully");

    config.apply_env_overrides();
    Ok(config)
}

/// Uses the file at `path` when given, otherwise defaults plus environment overrides.
pub fn load_or_default(path: Option<&Path>) -> Result<CliConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = CliConfig::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }
}
