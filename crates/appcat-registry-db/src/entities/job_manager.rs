// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::Result;
use crate::factory::ResourceType;
use crate::schema::{decode_enum, CatalogEntity, EntityDescriptor, ParentRef};
use crate::types::{JobManagerCommandType, ResourceJobManagerType};
use crate::value::FieldValue;

/// The batch system in front of a compute resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceJobManager {
	pub resource_job_manager_id: String,
	pub push_monitoring_endpoint: Option<String>,
	pub job_manager_bin_path: Option<String>,
	pub resource_job_manager_type: ResourceJobManagerType,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for ResourceJobManager {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::ResourceJobManager,
		table: "resource_job_managers",
		columns: &[
			"resource_job_manager_id",
			"push_monitoring_endpoint",
			"job_manager_bin_path",
			"resource_job_manager_type",
		],
		key_fields: &["resource_job_manager_id"],
		filter_fields: &["resource_job_manager_id", "resource_job_manager_type"],
		id_field: Some("resource_job_manager_id"),
		parents: &[],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			resource_job_manager_id: row.try_get("resource_job_manager_id")?,
			push_monitoring_endpoint: row.try_get("push_monitoring_endpoint")?,
			job_manager_bin_path: row.try_get("job_manager_bin_path")?,
			resource_job_manager_type: decode_enum(row, "resource_job_manager_type")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.resource_job_manager_id.clone().into(),
			self.push_monitoring_endpoint.clone().into(),
			self.job_manager_bin_path.clone().into(),
			self.resource_job_manager_type.into(),
		]
	}
}

/// A command line the job manager runs for one purpose, e.g. `qsub` for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobManagerCommand {
	pub resource_job_manager_id: String,
	pub command_type: JobManagerCommandType,
	pub command: String,
}

impl CatalogEntity for JobManagerCommand {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::JobManagerCommand,
		table: "job_manager_commands",
		columns: &["resource_job_manager_id", "command_type", "command"],
		key_fields: &["resource_job_manager_id", "command_type"],
		filter_fields: &["resource_job_manager_id", "command_type", "command"],
		id_field: None,
		parents: &[ParentRef {
			field: "resource_job_manager_id",
			parent: ResourceType::ResourceJobManager,
		}],
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			resource_job_manager_id: row.try_get("resource_job_manager_id")?,
			command_type: decode_enum(row, "command_type")?,
			command: row.try_get("command")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.resource_job_manager_id.clone().into(),
			self.command_type.into(),
			self.command.clone().into(),
		]
	}
}
