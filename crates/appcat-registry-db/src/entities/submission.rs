// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job submission interfaces and their protocol-specific settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::Result;
use crate::factory::ResourceType;
use crate::schema::{decode_enum, decode_optional_enum, CatalogEntity, EntityDescriptor, ParentRef};
use crate::types::{JobSubmissionProtocol, MonitorMode, SecurityProtocol};
use crate::value::FieldValue;

/// Links a compute resource to one way of submitting jobs to it.
///
/// Listings are ordered by `priority_order`, lowest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubmissionInterface {
	pub compute_resource_id: String,
	pub job_submission_interface_id: String,
	pub job_submission_protocol: JobSubmissionProtocol,
	pub priority_order: i32,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for JobSubmissionInterface {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::JobSubmissionInterface,
		table: "job_submission_interfaces",
		columns: &[
			"compute_resource_id",
			"job_submission_interface_id",
			"job_submission_protocol",
			"priority_order",
		],
		key_fields: &["compute_resource_id", "job_submission_interface_id"],
		filter_fields: &[
			"compute_resource_id",
			"job_submission_interface_id",
			"job_submission_protocol",
		],
		id_field: Some("job_submission_interface_id"),
		parents: &[ParentRef {
			field: "compute_resource_id",
			parent: ResourceType::ComputeResource,
		}],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			compute_resource_id: row.try_get("compute_resource_id")?,
			job_submission_interface_id: row.try_get("job_submission_interface_id")?,
			job_submission_protocol: decode_enum(row, "job_submission_protocol")?,
			priority_order: row.try_get("priority_order")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.compute_resource_id.clone().into(),
			self.job_submission_interface_id.clone().into(),
			self.job_submission_protocol.into(),
			self.priority_order.into(),
		]
	}

	fn sort_results(resources: &mut [Self]) {
		resources.sort_by_key(|r| r.priority_order);
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshJobSubmission {
	pub job_submission_interface_id: String,
	pub resource_job_manager_id: String,
	pub security_protocol: SecurityProtocol,
	pub alternative_ssh_hostname: Option<String>,
	pub ssh_port: Option<i32>,
	pub monitor_mode: Option<MonitorMode>,
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogEntity for SshJobSubmission {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::SshJobSubmission,
		table: "ssh_job_submissions",
		columns: &[
			"job_submission_interface_id",
			"resource_job_manager_id",
			"security_protocol",
			"alternative_ssh_hostname",
			"ssh_port",
			"monitor_mode",
		],
		key_fields: &["job_submission_interface_id"],
		filter_fields: &[
			"job_submission_interface_id",
			"resource_job_manager_id",
			"security_protocol",
		],
		id_field: Some("job_submission_interface_id"),
		parents: &[ParentRef {
			field: "resource_job_manager_id",
			parent: ResourceType::ResourceJobManager,
		}],
		timestamps: true,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			job_submission_interface_id: row.try_get("job_submission_interface_id")?,
			resource_job_manager_id: row.try_get("resource_job_manager_id")?,
			security_protocol: decode_enum(row, "security_protocol")?,
			alternative_ssh_hostname: row.try_get("alternative_ssh_hostname")?,
			ssh_port: row.try_get("ssh_port")?,
			monitor_mode: decode_optional_enum(row, "monitor_mode")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.job_submission_interface_id.clone().into(),
			self.resource_job_manager_id.clone().into(),
			self.security_protocol.into(),
			self.alternative_ssh_hostname.clone().into(),
			self.ssh_port.into(),
			self.monitor_mode.into(),
		]
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnicoreJobSubmission {
	pub job_submission_interface_id: String,
	pub security_protocol: SecurityProtocol,
	pub unicore_endpoint_url: String,
}

impl CatalogEntity for UnicoreJobSubmission {
	const DESCRIPTOR: &'static EntityDescriptor = &EntityDescriptor {
		resource_type: ResourceType::UnicoreJobSubmission,
		table: "unicore_job_submissions",
		columns: &[
			"job_submission_interface_id",
			"security_protocol",
			"unicore_endpoint_url",
		],
		key_fields: &["job_submission_interface_id"],
		filter_fields: &[
			"job_submission_interface_id",
			"security_protocol",
			"unicore_endpoint_url",
		],
		id_field: Some("job_submission_interface_id"),
		parents: &[],
		timestamps: false,
	};

	fn from_row(row: &SqliteRow) -> Result<Self> {
		Ok(Self {
			job_submission_interface_id: row.try_get("job_submission_interface_id")?,
			security_protocol: decode_enum(row, "security_protocol")?,
			unicore_endpoint_url: row.try_get("unicore_endpoint_url")?,
		})
	}

	fn values(&self) -> Vec<FieldValue> {
		vec![
			self.job_submission_interface_id.clone().into(),
			self.security_protocol.into(),
			self.unicore_endpoint_url.clone().into(),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entities::ResourceJobManager;
	use crate::error::CatalogError;
	use crate::repository::CatalogRepository;
	use crate::testing::create_catalog_test_pool;
	use crate::types::ResourceJobManagerType;

	fn ssh(manager: &str, monitor_mode: Option<MonitorMode>) -> SshJobSubmission {
		SshJobSubmission {
			job_submission_interface_id: "ssh-1".to_string(),
			resource_job_manager_id: manager.to_string(),
			security_protocol: SecurityProtocol::SshKeys,
			alternative_ssh_hostname: None,
			ssh_port: Some(22),
			monitor_mode,
			created_at: None,
			updated_at: None,
		}
	}

	#[tokio::test]
	async fn test_ssh_submission_resolves_job_manager() {
		let pool = create_catalog_test_pool().await;
		let submissions = CatalogRepository::<SshJobSubmission>::new(pool.clone());

		let err = submissions.save(&ssh("pbs1", None)).await.unwrap_err();
		assert!(matches!(err, CatalogError::NotFound(_)));

		CatalogRepository::<ResourceJobManager>::new(pool)
			.save(&ResourceJobManager {
				resource_job_manager_id: "pbs1".to_string(),
				push_monitoring_endpoint: None,
				job_manager_bin_path: None,
				resource_job_manager_type: ResourceJobManagerType::Pbs,
				created_at: None,
				updated_at: None,
			})
			.await
			.unwrap();
		submissions.save(&ssh("pbs1", None)).await.unwrap();
		submissions
			.save(&ssh("pbs1", Some(MonitorMode::PollJobManager)))
			.await
			.unwrap();

		let stored = submissions.get(&"ssh-1".into()).await.unwrap();
		assert_eq!(stored.monitor_mode, Some(MonitorMode::PollJobManager));
		assert_eq!(stored.ssh_port, Some(22));
		assert!(stored.created_at.is_some());
		assert!(stored.updated_at.is_some());
	}

	#[tokio::test]
	async fn test_unicore_submission_ids() {
		let repo = CatalogRepository::<UnicoreJobSubmission>::new(create_catalog_test_pool().await);
		repo
			.save(&UnicoreJobSubmission {
				job_submission_interface_id: "unicore-1".to_string(),
				security_protocol: SecurityProtocol::Gsi,
				unicore_endpoint_url: "https://unicore.example.org:8080".to_string(),
			})
			.await
			.unwrap();
		assert_eq!(
			repo.get_ids("security_protocol", SecurityProtocol::Gsi.into())
				.await
				.unwrap(),
			vec!["unicore-1"]
		);
	}
}
