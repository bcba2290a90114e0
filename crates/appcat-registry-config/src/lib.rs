// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the application catalog registry.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of the merged result
//! - Consistent environment variable naming (`APPCAT_REGISTRY_*`)
//!
//! # Usage
//!
//! ```ignore
//! use appcat_registry_config::load_config;
//!
//! let config = load_config()?;
//! println!("Catalog database at {}", config.database.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::RegistryConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved registry configuration.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`APPCAT_REGISTRY_*`)
/// 2. Config file (`/etc/appcat/registry.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<RegistryConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<RegistryConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<RegistryConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = RegistryConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: RegistryConfigLayer) -> Result<RegistryConfig, ConfigError> {
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&database)?;

	info!(
		database = %database.url,
		max_connections = database.max_connections,
		log_level = %logging.level,
		log_json = logging.json,
		"Registry configuration loaded"
	);

	Ok(RegistryConfig { database, logging })
}

fn validate_config(database: &DatabaseConfig) -> Result<(), ConfigError> {
	if !database.url.starts_with("sqlite:") {
		return Err(ConfigError::Validation(format!(
			"database url '{}' must start with sqlite:",
			database.url
		)));
	}
	if database.max_connections == 0 {
		return Err(ConfigError::Validation(
			"database max_connections must be at least 1".to_string(),
		));
	}
	Ok(())
}
