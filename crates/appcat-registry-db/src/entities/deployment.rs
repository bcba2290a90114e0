// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application modules, their deployments, and per-deployment environment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::Result;
use crate::factory::ResourceType;
use crate::schema::{CatalogEntity, EntityDescriptor, ParentRef};
use crate::value::FieldValue;

const DEPLOYMENT_PARENT: &[ParentRef] = &[ParentRef {
	field: "deployment_id",
	parent: ResourceType::ApplicationDeployment,
}];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationModule {
	pub module_id: String,
	pub module_name: String,
	pub module_version: Option<String>,
	pub module_description: Option<String>,
	pub gateway_id: String,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for ApplicationModule {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::ApplicationModule,
		table: "application_modules",
		columns: &[
			"module_id",
			"module_name",
			"module_version",
			"module_description",
			"gateway_id",
		],
		key_fields: &["module_id"],
		filter_fields: &["module_id", "module_name", "gateway_id"],
		id_field: Some("module_id"),
		parents: &[],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			module_id: row.try_get("module_id")?,
			module_name: row.try_get("module_name")?,
			module_version: row.try_get("module_version")?,
			module_description: row.try_get("module_description")?,
			gateway_id: row.try_get("gateway_id")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.module_id.clone().into(),
			self.module_name.clone().into(),
			self.module_version.clone().into(),
			self.module_description.clone().into(),
			self.gateway_id.clone().into(),
		]
	}
}

/// An application module installed on a compute host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDeployment {
	pub deployment_id: String,
	pub app_module_id: String,
	pub compute_host_id: String,
	pub executable_path: String,
	/// `SERIAL`, `MPI`, `OPENMP`, ...
	pub parallelism: String,
	pub application_description: Option<String>,
	pub gateway_id: String,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for ApplicationDeployment {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::ApplicationDeployment,
		table: "application_deployments",
		columns: &[
			"deployment_id",
			"app_module_id",
			"compute_host_id",
			"executable_path",
			"parallelism",
			"application_description",
			"gateway_id",
		],
		key_fields: &["deployment_id"],
		filter_fields: &["deployment_id", "app_module_id", "compute_host_id", "gateway_id"],
		id_field: Some("deployment_id"),
		parents: &[
			ParentRef {
				field: "app_module_id",
				parent: ResourceType::ApplicationModule,
			},
			ParentRef {
				field: "compute_host_id",
				parent: ResourceType::ComputeResource,
			},
		],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			deployment_id: row.try_get("deployment_id")?,
			app_module_id: row.try_get("app_module_id")?,
			compute_host_id: row.try_get("compute_host_id")?,
			executable_path: row.try_get("executable_path")?,
			parallelism: row.try_get("parallelism")?,
			application_description: row.try_get("application_description")?,
			gateway_id: row.try_get("gateway_id")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.deployment_id.clone().into(),
			self.app_module_id.clone().into(),
			self.compute_host_id.clone().into(),
			self.executable_path.clone().into(),
			self.parallelism.clone().into(),
			self.application_description.clone().into(),
			self.gateway_id.clone().into(),
		]
	}
}

/// A path prepended to a library search variable before the application runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPrependPath {
	pub deployment_id: String,
	pub name: String,
	pub value: String,
}

impl CatalogEntity for LibraryPrependPath {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::LibraryPrependPath,
		table: "library_prepend_paths",
		columns: &["deployment_id", "name", "value"],
		key_fields: &["deployment_id", "name"],
		filter_fields: &["deployment_id", "name"],
		id_field: None,
		parents: DEPLOYMENT_PARENT,
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			deployment_id: row.try_get("deployment_id")?,
			name: row.try_get("name")?,
			value: row.try_get("value")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.deployment_id.clone().into(),
			self.name.clone().into(),
			self.value.clone().into(),
		]
	}
}

/// A path appended to a library search variable before the application runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryAppendPath {
	pub deployment_id: String,
	pub name: String,
	pub value: String,
}

impl CatalogEntity for LibraryAppendPath {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::LibraryAppendPath,
		table: "library_append_paths",
		columns: &["deployment_id", "name", "value"],
		key_fields: &["deployment_id", "name"],
		filter_fields: &["deployment_id", "name"],
		id_field: None,
		parents: DEPLOYMENT_PARENT,
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			deployment_id: row.try_get("deployment_id")?,
			name: row.try_get("name")?,
			value: row.try_get("value")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.deployment_id.clone().into(),
			self.name.clone().into(),
			self.value.clone().into(),
		]
	}
}

/// An environment variable exported before the application runs.
///
/// Listings are sorted by `env_order`; variables without an order come first
/// and ties keep their stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppEnvironment {
	pub deployment_id: String,
	pub name: String,
	pub value: String,
	pub env_order: Option<i32>,
}

impl CatalogEntity for AppEnvironment {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::AppEnvironment,
		table: "app_environments",
		columns: &["deployment_id", "name", "value", "env_order"],
		key_fields: &["deployment_id", "name"],
		filter_fields: &["deployment_id", "name"],
		id_field: None,
		parents: DEPLOYMENT_PARENT,
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			deployment_id: row.try_get("deployment_id")?,
			name: row.try_get("name")?,
			value: row.try_get("value")?,
			env_order: row.try_get("env_order")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.deployment_id.clone().into(),
			self.name.clone().into(),
			self.value.clone().into(),
			self.env_order.into(),
		]
	}

	fn sort_results(resources: &mut [Self]) {
		// Option orders None before Some.
		resources.sort_by_key(|e| e.env_order);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entities::ComputeResource;
	use crate::key::CatalogKey;
	use crate::repository::CatalogRepository;
	use crate::testing::create_catalog_test_pool;
	use proptest::prelude::*;

	fn path(name: &str, value: &str) -> LibraryPrependPath {
		LibraryPrependPath {
			deployment_id: "namd-stampede".to_string(),
			name: name.to_string(),
			value: value.to_string(),
		}
	}

	#[tokio::test]
	async fn test_deployment_paths_by_deployment() {
		let pool = create_catalog_test_pool().await;
		CatalogRepository::<ComputeResource>::new(pool.clone())
			.save(&ComputeResource {
				resource_id: "stampede".to_string(),
				host_name: "stampede.tacc.utexas.edu".to_string(),
				resource_description: None,
				max_memory_per_node: None,
				created_at: None,
				updated_at: None,
			})
			.await
			.unwrap();
		CatalogRepository::<ApplicationModule>::new(pool.clone())
			.save(&ApplicationModule {
				module_id: "namd".to_string(),
				module_name: "NAMD".to_string(),
				module_version: None,
				module_description: None,
				gateway_id: "seagrid".to_string(),
				created_at: None,
				updated_at: None,
			})
			.await
			.unwrap();
		let deployments = CatalogRepository::<ApplicationDeployment>::new(pool.clone());
		deployments
			.save(&ApplicationDeployment {
				deployment_id: "namd-stampede".to_string(),
				app_module_id: "namd".to_string(),
				compute_host_id: "stampede".to_string(),
				executable_path: "/opt/namd/namd2".to_string(),
				parallelism: "MPI".to_string(),
				application_description: None,
				gateway_id: "seagrid".to_string(),
				created_at: None,
				updated_at: None,
			})
			.await
			.unwrap();
		assert_eq!(
			deployments
				.get_ids("app_module_id", "namd".into())
				.await
				.unwrap(),
			vec!["namd-stampede"]
		);

		let prepends = CatalogRepository::<LibraryPrependPath>::new(pool);
		prepends.save(&path("LD_LIBRARY_PATH", "/opt/namd/lib")).await.unwrap();
		prepends.save(&path("PATH", "/opt/namd/bin")).await.unwrap();
		prepends.save(&path("PATH", "/opt/namd/2.14/bin")).await.unwrap();

		let listed = prepends
			.get_by_field("deployment_id", "namd-stampede".into())
			.await
			.unwrap();
		assert_eq!(
			listed,
			vec![
				path("LD_LIBRARY_PATH", "/opt/namd/lib"),
				path("PATH", "/opt/namd/2.14/bin"),
			]
		);

		let key = CatalogKey::new()
			.with("deployment_id", "namd-stampede")
			.with("name", "PATH");
		assert!(prepends.remove(&key).await.unwrap());
		assert_eq!(prepends.get_all().await.unwrap().len(), 1);
	}

	fn env(name: String, env_order: Option<i32>) -> AppEnvironment {
		AppEnvironment {
			deployment_id: "d1".to_string(),
			name,
			value: String::new(),
			env_order,
		}
	}

	proptest! {
		/// Sorting orders by env_order with nulls first and keeps ties in input order.
		#[test]
		fn env_sort_is_stable_nulls_first(orders in prop::collection::vec(prop::option::of(0i32..4), 0..20)) {
			let mut variables: Vec<AppEnvironment> = orders
				.iter()
				.enumerate()
				.map(|(i, order)| env(i.to_string(), *order))
				.collect();
			AppEnvironment::sort_results(&mut variables);

			for pair in variables.windows(2) {
				prop_assert!(pair[0].env_order <= pair[1].env_order);
				if pair[0].env_order == pair[1].env_order {
					let a: usize = pair[0].name.parse().unwrap();
					let b: usize = pair[1].name.parse().unwrap();
					prop_assert!(a < b);
				}
			}
		}
	}
}
