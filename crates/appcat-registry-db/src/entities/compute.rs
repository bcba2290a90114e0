// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Compute resources and the records hanging off them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::Result;
use crate::factory::ResourceType;
use crate::schema::{CatalogEntity, EntityDescriptor, ParentRef};
use crate::value::FieldValue;

const COMPUTE_PARENT: &[ParentRef] = &[ParentRef {
	field: "compute_resource_id",
	parent: ResourceType::ComputeResource,
}];

const HOST_PARENT: &[ParentRef] = &[ParentRef {
	field: "resource_id",
	parent: ResourceType::ComputeResource,
}];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeResource {
	pub resource_id: String,
	pub host_name: String,
	pub resource_description: Option<String>,
	/// Megabytes.
	pub max_memory_per_node: Option<i32>,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for ComputeResource {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::ComputeResource,
		table: "compute_resources",
		columns: &[
			"resource_id",
			"host_name",
			"resource_description",
			"max_memory_per_node",
		],
		key_fields: &["resource_id"],
		filter_fields: &["resource_id", "host_name", "resource_description"],
		id_field: Some("resource_id"),
		parents: &[],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			resource_id: row.try_get("resource_id")?,
			host_name: row.try_get("host_name")?,
			resource_description: row.try_get("resource_description")?,
			max_memory_per_node: row.try_get("max_memory_per_node")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.resource_id.clone().into(),
			self.host_name.clone().into(),
			self.resource_description.clone().into(),
			self.max_memory_per_node.into(),
		]
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostAlias {
	pub resource_id: String,
	pub alias: String,
}

impl CatalogEntity for HostAlias {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::HostAlias,
		table: "host_aliases",
		columns: &["resource_id", "alias"],
		key_fields: &["resource_id", "alias"],
		filter_fields: &["resource_id", "alias"],
		id_field: None,
		parents: HOST_PARENT,
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			resource_id: row.try_get("resource_id")?,
			alias: row.try_get("alias")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![self.resource_id.clone().into(), self.alias.clone().into()]
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostIpAddress {
	pub resource_id: String,
	pub ip_address: String,
}

impl CatalogEntity for HostIpAddress {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::HostIpAddress,
		table: "host_ip_addresses",
		columns: &["resource_id", "ip_address"],
		key_fields: &["resource_id", "ip_address"],
		filter_fields: &["resource_id", "ip_address"],
		id_field: None,
		parents: HOST_PARENT,
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			resource_id: row.try_get("resource_id")?,
			ip_address: row.try_get("ip_address")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![self.resource_id.clone().into(), self.ip_address.clone().into()]
	}
}

/// A named file system root (`HOME`, `SCRATCH`, ...) on a compute resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeResourceFileSystem {
	pub compute_resource_id: String,
	pub file_system: String,
	pub path: String,
}

impl CatalogEntity for ComputeResourceFileSystem {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::ComputeResourceFileSystem,
		table: "compute_resource_file_systems",
		columns: &["compute_resource_id", "file_system", "path"],
		key_fields: &["compute_resource_id", "file_system"],
		filter_fields: &["compute_resource_id", "file_system"],
		id_field: None,
		parents: COMPUTE_PARENT,
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			compute_resource_id: row.try_get("compute_resource_id")?,
			file_system: row.try_get("file_system")?,
			path: row.try_get("path")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.compute_resource_id.clone().into(),
			self.file_system.clone().into(),
			self.path.clone().into(),
		]
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchQueue {
	pub compute_resource_id: String,
	pub queue_name: String,
	pub queue_description: Option<String>,
	/// Minutes.
	pub max_runtime: Option<i32>,
	pub max_nodes: Option<i32>,
	pub max_processors: Option<i32>,
	pub max_job_in_queue: Option<i32>,
	pub max_memory: Option<i32>,
}

impl CatalogEntity for BatchQueue {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::BatchQueue,
		table: "batch_queues",
		columns: &[
			"compute_resource_id",
			"queue_name",
			"queue_description",
			"max_runtime",
			"max_nodes",
			"max_processors",
			"max_job_in_queue",
			"max_memory",
		],
		key_fields: &["compute_resource_id", "queue_name"],
		filter_fields: &["compute_resource_id", "queue_name"],
		id_field: None,
		parents: COMPUTE_PARENT,
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			compute_resource_id: row.try_get("compute_resource_id")?,
			queue_name: row.try_get("queue_name")?,
			queue_description: row.try_get("queue_description")?,
			max_runtime: row.try_get("max_runtime")?,
			max_nodes: row.try_get("max_nodes")?,
			max_processors: row.try_get("max_processors")?,
			max_job_in_queue: row.try_get("max_job_in_queue")?,
			max_memory: row.try_get("max_memory")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.compute_resource_id.clone().into(),
			self.queue_name.clone().into(),
			self.queue_description.clone().into(),
			self.max_runtime.into(),
			self.max_nodes.into(),
			self.max_processors.into(),
			self.max_job_in_queue.into(),
			self.max_memory.into(),
		]
	}
}
