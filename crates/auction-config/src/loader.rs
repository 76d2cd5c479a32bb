//! Configuration loading from files and environment.

use crate::types::{CommonConfig, ConfigError};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Loads a composed [`CommonConfig`] from toml, json or yaml, then applies
/// environment overrides and validates.
pub struct ConfigLoader;

impl ConfigLoader {
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CommonConfig> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		let mut config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents)?,
			Some("json") => Self::from_json(&contents)?,
			Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		};

		Self::apply_env_overrides(&mut config);
		config.validate().map_err(anyhow::Error::from)?;
		Ok(config)
	}

	pub fn from_toml(contents: &str) -> Result<CommonConfig> {
		toml::from_str(contents).context("Failed to parse TOML")
	}

	pub fn from_json(contents: &str) -> Result<CommonConfig> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	pub fn from_yaml(contents: &str) -> Result<CommonConfig> {
		serde_yaml::from_str(contents).context("Failed to parse YAML")
	}

	/// Built-in deployment for a chain id, with environment overrides.
	pub fn for_chain(chain_id: u64) -> Result<CommonConfig, ConfigError> {
		let mut config = crate::presets::for_chain(auction_types::ChainId(chain_id))?;
		Self::apply_env_overrides(&mut config);
		Ok(config)
	}

	fn apply_env_overrides(config: &mut CommonConfig) {
		if let Ok(key) = std::env::var("FILLER_API_KEY") {
			debug!("Overriding filler API key from environment");
			config.filler_api_key = key;
		}
		if let Ok(forced) = std::env::var("FORCE_SOLVERS") {
			let solvers: Vec<String> = forced
				.split(',')
				.map(|s| s.trim().to_string())
				.filter(|s| !s.is_empty())
				.collect();
			if !solvers.is_empty() {
				debug!("Restricting dispatch to forced solvers: {:?}", solvers);
				config.force_solvers = solvers;
			}
		}
	}
}
