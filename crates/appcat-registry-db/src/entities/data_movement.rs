// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data movement interfaces and their protocol-specific settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::Result;
use crate::factory::ResourceType;
use crate::schema::{decode_enum, CatalogEntity, EntityDescriptor, ParentRef};
use crate::types::{DataMovementProtocol, SecurityProtocol};
use crate::value::FieldValue;

/// Links a compute resource to one way of staging data. Listings are
/// ordered by `priority_order`, lowest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataMovementInterface {
	pub compute_resource_id: String,
	pub data_movement_interface_id: String,
	pub data_movement_protocol: DataMovementProtocol,
	pub priority_order: i32,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for DataMovementInterface {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::DataMovementInterface,
		table: "data_movement_interfaces",
		columns: &[
			"compute_resource_id",
			"data_movement_interface_id",
			"data_movement_protocol",
			"priority_order",
		],
		key_fields: &["compute_resource_id", "data_movement_interface_id"],
		filter_fields: &[
			"compute_resource_id",
			"data_movement_interface_id",
			"data_movement_protocol",
		],
		id_field: Some("data_movement_interface_id"),
		parents: &[ParentRef {
			field: "compute_resource_id",
			parent: ResourceType::ComputeResource,
		}],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			compute_resource_id: row.try_get("compute_resource_id")?,
			data_movement_interface_id: row.try_get("data_movement_interface_id")?,
			data_movement_protocol: decode_enum(row, "data_movement_protocol")?,
			priority_order: row.try_get("priority_order")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.compute_resource_id.clone().into(),
			self.data_movement_interface_id.clone().into(),
			self.data_movement_protocol.into(),
			self.priority_order.into(),
		]
	}

	fn sort_results(resources: &mut [Self]) {
		resources.sort_by_key(|r| r.priority_order);
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScpDataMovement {
	pub data_movement_interface_id: String,
	pub queue_description: Option<String>,
	pub security_protocol: SecurityProtocol,
	pub alternative_scp_hostname: Option<String>,
	pub ssh_port: Option<i32>,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for ScpDataMovement {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::ScpDataMovement,
		table: "scp_data_movements",
		columns: &[
			"data_movement_interface_id",
			"queue_description",
			"security_protocol",
			"alternative_scp_hostname",
			"ssh_port",
		],
		key_fields: &["data_movement_interface_id"],
		filter_fields: &[
			"data_movement_interface_id",
			"security_protocol",
			"alternative_scp_hostname",
		],
		id_field: Some("data_movement_interface_id"),
		parents: &[],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			data_movement_interface_id: row.try_get("data_movement_interface_id")?,
			queue_description: row.try_get("queue_description")?,
			security_protocol: decode_enum(row, "security_protocol")?,
			alternative_scp_hostname: row.try_get("alternative_scp_hostname")?,
			ssh_port: row.try_get("ssh_port")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.data_movement_interface_id.clone().into(),
			self.queue_description.clone().into(),
			self.security_protocol.into(),
			self.alternative_scp_hostname.clone().into(),
			self.ssh_port.into(),
		]
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridftpDataMovement {
	pub data_movement_interface_id: String,
	pub security_protocol: SecurityProtocol,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for GridftpDataMovement {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::GridftpDataMovement,
		table: "gridftp_data_movements",
		columns: &["data_movement_interface_id", "security_protocol"],
		key_fields: &["data_movement_interface_id"],
		filter_fields: &["data_movement_interface_id", "security_protocol"],
		id_field: Some("data_movement_interface_id"),
		parents: &[],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			data_movement_interface_id: row.try_get("data_movement_interface_id")?,
			security_protocol: decode_enum(row, "security_protocol")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.data_movement_interface_id.clone().into(),
			self.security_protocol.into(),
		]
	}
}

/// One `gsiftp://` endpoint served by a GridFTP data movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridftpEndpoint {
	pub data_movement_interface_id: String,
	pub endpoint: String,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for GridftpEndpoint {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::GridftpEndpoint,
		table: "gridftp_endpoints",
		columns: &["data_movement_interface_id", "endpoint"],
		key_fields: &["data_movement_interface_id", "endpoint"],
		filter_fields: &["data_movement_interface_id", "endpoint"],
		id_field: None,
		parents: &[ParentRef {
			field: "data_movement_interface_id",
			parent: ResourceType::GridftpDataMovement,
		}],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			data_movement_interface_id: row.try_get("data_movement_interface_id")?,
			endpoint: row.try_get("endpoint")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.data_movement_interface_id.clone().into(),
			self.endpoint.clone().into(),
		]
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnicoreDataMovement {
	pub data_movement_interface_id: String,
	pub security_protocol: SecurityProtocol,
	pub unicore_endpoint_url: String,
}

impl CatalogEntity for UnicoreDataMovement {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::UnicoreDataMovement,
		table: "unicore_data_movements",
		columns: &[
			"data_movement_interface_id",
			"security_protocol",
			"unicore_endpoint_url",
		],
		key_fields: &["data_movement_interface_id"],
		filter_fields: &[
			"data_movement_interface_id",
			"security_protocol",
			"unicore_endpoint_url",
		],
		id_field: Some("data_movement_interface_id"),
		parents: &[],
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			data_movement_interface_id: row.try_get("data_movement_interface_id")?,
			security_protocol: decode_enum(row, "security_protocol")?,
			unicore_endpoint_url: row.try_get("unicore_endpoint_url")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.data_movement_interface_id.clone().into(),
			self.security_protocol.into(),
			self.unicore_endpoint_url.clone().into(),
		]
	}
}
