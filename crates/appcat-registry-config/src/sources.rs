// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::RegistryConfigLayer;
use crate::sections::{DatabaseConfigLayer, LoggingConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<RegistryConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<RegistryConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(RegistryConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/appcat/registry.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<RegistryConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(RegistryConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: RegistryConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: APPCAT_REGISTRY_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<RegistryConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let database = DatabaseConfigLayer {
			url: env_var("APPCAT_REGISTRY_DATABASE_URL"),
			max_connections: env_number("APPCAT_REGISTRY_DATABASE_MAX_CONNECTIONS")?,
			busy_timeout_secs: env_number("APPCAT_REGISTRY_DATABASE_BUSY_TIMEOUT_SECS")?,
		};
		let logging = LoggingConfigLayer {
			level: env_var("APPCAT_REGISTRY_LOG_LEVEL"),
			json: env_var("APPCAT_REGISTRY_LOG_JSON").map(|v| v.eq_ignore_ascii_case("true") || v == "1"),
		};
		Ok(RegistryConfigLayer {
			database: Some(database),
			logging: Some(logging),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_number<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
	env_var(name)
		.map(|v| {
			v.parse().map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("'{v}' is not a number"),
			})
		})
		.transpose()
}
