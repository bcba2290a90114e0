// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration, as produced by a single source.

use serde::Deserialize;

use crate::sections::{DatabaseConfigLayer, LoggingConfigLayer};

/// One source's view of the configuration. Absent sections and fields
/// leave lower-precedence values in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl RegistryConfigLayer {
	pub fn merge(&mut self, other: RegistryConfigLayer) {
		if let Some(database) = other.database {
			self.database.get_or_insert_with(Default::default).merge(database);
		}
		if let Some(logging) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(logging);
		}
	}
}
