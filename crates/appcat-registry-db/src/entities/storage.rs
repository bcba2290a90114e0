// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage resources and per-gateway storage settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::fmt;

use crate::error::Result;
use crate::factory::ResourceType;
use crate::schema::{decode_enum, CatalogEntity, EntityDescriptor, ParentRef};
use crate::types::DataMovementProtocol;
use crate::value::FieldValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageResource {
	pub storage_resource_id: String,
	pub host_name: String,
	pub storage_resource_description: Option<String>,
	pub enabled: bool,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for StorageResource {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::StorageResource,
		table: "storage_resources",
		columns: &[
			"storage_resource_id",
			"host_name",
			"storage_resource_description",
			"enabled",
		],
		key_fields: &["storage_resource_id"],
		filter_fields: &["storage_resource_id", "host_name", "enabled"],
		id_field: Some("storage_resource_id"),
		parents: &[],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			storage_resource_id: row.try_get("storage_resource_id")?,
			host_name: row.try_get("host_name")?,
			storage_resource_description: row.try_get("storage_resource_description")?,
			enabled: row.try_get("enabled")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.storage_resource_id.clone().into(),
			self.host_name.clone().into(),
			self.storage_resource_description.clone().into(),
			self.enabled.into(),
		]
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageInterface {
	pub storage_resource_id: String,
	pub data_movement_interface_id: String,
	pub data_movement_protocol: DataMovementProtocol,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for StorageInterface {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::StorageInterface,
		table: "storage_interfaces",
		columns: &[
			"storage_resource_id",
			"data_movement_interface_id",
			"data_movement_protocol",
		],
		key_fields: &["storage_resource_id", "data_movement_interface_id"],
		filter_fields: &[
			"storage_resource_id",
			"data_movement_interface_id",
			"data_movement_protocol",
		],
		id_field: Some("data_movement_interface_id"),
		parents: &[ParentRef {
			field: "storage_resource_id",
			parent: ResourceType::StorageResource,
		}],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			storage_resource_id: row.try_get("storage_resource_id")?,
			data_movement_interface_id: row.try_get("data_movement_interface_id")?,
			data_movement_protocol: decode_enum(row, "data_movement_protocol")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.storage_resource_id.clone().into(),
			self.data_movement_interface_id.clone().into(),
			self.data_movement_protocol.into(),
		]
	}
}

/// Per-gateway resource profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayProfile {
	pub gateway_id: String,
	pub credential_store_token: Option<String>,
	pub identity_server_tenant: Option<String>,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for GatewayProfile {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::GatewayProfile,
		table: "gateway_profiles",
		columns: &[
			"gateway_id",
			"credential_store_token",
			"identity_server_tenant",
		],
		key_fields: &["gateway_id"],
		filter_fields: &["gateway_id", "identity_server_tenant"],
		id_field: Some("gateway_id"),
		parents: &[],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			gateway_id: row.try_get("gateway_id")?,
			credential_store_token: row.try_get("credential_store_token")?,
			identity_server_tenant: row.try_get("identity_server_tenant")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.gateway_id.clone().into(),
			self.credential_store_token.clone().into(),
			self.identity_server_tenant.clone().into(),
		]
	}
}

/// A gateway's login and root directory on one storage resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoragePreference {
	pub gateway_id: String,
	pub storage_resource_id: String,
	pub login_user_name: Option<String>,
	pub file_system_root_location: Option<String>,
	pub resource_specific_credential_store_token: Option<String>,
}

impl CatalogEntity for StoragePreference {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::StoragePreference,
		table: "storage_preferences",
		columns: &[
			"gateway_id",
			"storage_resource_id",
			"login_user_name",
			"file_system_root_location",
			"resource_specific_credential_store_token",
		],
		key_fields: &["gateway_id", "storage_resource_id"],
		filter_fields: &["gateway_id", "storage_resource_id"],
		id_field: None,
		parents: &[
			ParentRef {
				field: "gateway_id",
				parent: ResourceType::GatewayProfile,
			},
			ParentRef {
				field: "storage_resource_id",
				parent: ResourceType::StorageResource,
			},
		],
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			gateway_id: row.try_get("gateway_id")?,
			storage_resource_id: row.try_get("storage_resource_id")?,
			login_user_name: row.try_get("login_user_name")?,
			file_system_root_location: row.try_get("file_system_root_location")?,
			resource_specific_credential_store_token: row
				.try_get("resource_specific_credential_store_token")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.gateway_id.clone().into(),
			self.storage_resource_id.clone().into(),
			self.login_user_name.clone().into(),
			self.file_system_root_location.clone().into(),
			self.resource_specific_credential_store_token.clone().into(),
		]
	}
}

/// OAuth client registered for a gateway.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayClientCredential {
	pub client_key: String,
	pub client_secret: String,
	pub gateway_id: String,
}

impl fmt::Debug for GatewayClientCredential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GatewayClientCredential")
			.field("client_key", &self.client_key)
			.field("client_secret", &"[REDACTED]")
			.field("gateway_id", &self.gateway_id)
			.finish()
	}
}

impl CatalogEntity for GatewayClientCredential {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::GatewayClientCredential,
		table: "gateway_client_credentials",
		columns: &["client_key", "client_secret", "gateway_id"],
		key_fields: &["client_key"],
		filter_fields: &["client_key", "gateway_id"],
		id_field: Some("client_key"),
		parents: &[],
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			client_key: row.try_get("client_key")?,
			client_secret: row.try_get("client_secret")?,
			gateway_id: row.try_get("gateway_id")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.client_key.clone().into(),
			self.client_secret.clone().into(),
			self.gateway_id.clone().into(),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::CatalogError;
	use crate::key::CatalogKey;
	use crate::repository::CatalogRepository;
	use crate::testing::create_catalog_test_pool;

	fn gateway(id: &str) -> GatewayProfile {
		GatewayProfile {
			gateway_id: id.to_string(),
			credential_store_token: None,
			identity_server_tenant: Some("tenant".to_string()),
			created_at: None,
			updated_at: None,
		}
	}

	fn storage(id: &str) -> StorageResource {
		StorageResource {
			storage_resource_id: id.to_string(),
			host_name: format!("{id}.example.org"),
			storage_resource_description: None,
			enabled: true,
			created_at: None,
			updated_at: None,
		}
	}

	fn preference(gateway_id: &str, storage_id: &str) -> StoragePreference {
		StoragePreference {
			gateway_id: gateway_id.to_string(),
			storage_resource_id: storage_id.to_string(),
			login_user_name: Some("pga".to_string()),
			file_system_root_location: Some("/data/gateway".to_string()),
			resource_specific_credential_store_token: None,
		}
	}

	#[tokio::test]
	async fn test_storage_preference_needs_both_parents() {
		let pool = create_catalog_test_pool().await;
		let preferences = CatalogRepository::<StoragePreference>::new(pool.clone());
		CatalogRepository::<GatewayProfile>::new(pool.clone())
			.save(&gateway("seagrid"))
			.await
			.unwrap();

		let err = preferences
			.save(&preference("seagrid", "archive"))
			.await
			.unwrap_err();
		assert!(matches!(err, CatalogError::NotFound(_)));

		CatalogRepository::<StorageResource>::new(pool)
			.save(&storage("archive"))
			.await
			.unwrap();
		preferences.save(&preference("seagrid", "archive")).await.unwrap();

		let key = CatalogKey::new()
			.with("storage_resource_id", "archive")
			.with("gateway_id", "seagrid");
		assert_eq!(
			preferences.get(&key).await.unwrap(),
			preference("seagrid", "archive")
		);
		assert!(matches!(
			preferences.get_all_ids().await,
			Err(CatalogError::Unsupported(_))
		));
	}

	#[tokio::test]
	async fn test_storage_resource_bool_filter() {
		let repo = CatalogRepository::<StorageResource>::new(create_catalog_test_pool().await);
		repo.save(&storage("archive")).await.unwrap();
		let mut disabled = storage("scratch");
		disabled.enabled = false;
		repo.save(&disabled).await.unwrap();

		assert_eq!(
			repo.get_ids("enabled", true.into()).await.unwrap(),
			vec!["archive"]
		);
		assert!(!repo.get(&"scratch".into()).await.unwrap().enabled);
	}

	#[test]
	fn test_client_secret_not_in_debug() {
		let credential = GatewayClientCredential {
			client_key: "key".to_string(),
			client_secret: "hunter2".to_string(),
			gateway_id: "seagrid".to_string(),
		};
		let debug = format!("{credential:?}");
		assert!(!debug.contains("hunter2"));
		assert!(debug.contains("[REDACTED]"));
	}
}
