// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tag-dispatched access to every catalog repository.

use sqlx::sqlite::SqlitePool;

use crate::entities::*;
use crate::error::Result;
use crate::factory::{AnyResource, ResourceType};
use crate::key::CatalogKey;
use crate::repository::CatalogRepository;
use crate::schema::CatalogEntity;
use crate::session::SessionProvider;
use crate::value::FieldValue;

/// Runs `$body` with `$repo` bound to the typed repository for `$tag`.
macro_rules! dispatch {
	($registry:expr, $tag:expr, |$repo:ident| $body:expr) => {
		match $tag {
			ResourceType::ComputeResource => { let $repo = $registry.repository::<ComputeResource>(); $body }
			ResourceType::HostAlias => { let $repo = $registry.repository::<HostAlias>(); $body }
			ResourceType::HostIpAddress => { let $repo = $registry.repository::<HostIpAddress>(); $body }
			ResourceType::ComputeResourceFileSystem => { let $repo = $registry.repository::<ComputeResourceFileSystem>(); $body }
			ResourceType::BatchQueue => { let $repo = $registry.repository::<BatchQueue>(); $body }
			ResourceType::ResourceJobManager => { let $repo = $registry.repository::<ResourceJobManager>(); $body }
			ResourceType::JobManagerCommand => { let $repo = $registry.repository::<JobManagerCommand>(); $body }
			ResourceType::JobSubmissionInterface => { let $repo = $registry.repository::<JobSubmissionInterface>(); $body }
			ResourceType::SshJobSubmission => { let $repo = $registry.repository::<SshJobSubmission>(); $body }
			ResourceType::UnicoreJobSubmission => { let $repo = $registry.repository::<UnicoreJobSubmission>(); $body }
			ResourceType::DataMovementInterface => { let $repo = $registry.repository::<DataMovementInterface>(); $body }
			ResourceType::ScpDataMovement => { let $repo = $registry.repository::<ScpDataMovement>(); $body }
			ResourceType::GridftpDataMovement => { let $repo = $registry.repository::<GridftpDataMovement>(); $body }
			ResourceType::GridftpEndpoint => { let $repo = $registry.repository::<GridftpEndpoint>(); $body }
			ResourceType::UnicoreDataMovement => { let $repo = $registry.repository::<UnicoreDataMovement>(); $body }
			ResourceType::StorageResource => { let $repo = $registry.repository::<StorageResource>(); $body }
			ResourceType::StorageInterface => { let $repo = $registry.repository::<StorageInterface>(); $body }
			ResourceType::GatewayProfile => { let $repo = $registry.repository::<GatewayProfile>(); $body }
			ResourceType::StoragePreference => { let $repo = $registry.repository::<StoragePreference>(); $body }
			ResourceType::GatewayClientCredential => { let $repo = $registry.repository::<GatewayClientCredential>(); $body }
			ResourceType::ApplicationModule => { let $repo = $registry.repository::<ApplicationModule>(); $body }
			ResourceType::ApplicationDeployment => { let $repo = $registry.repository::<ApplicationDeployment>(); $body }
			ResourceType::LibraryPrependPath => { let $repo = $registry.repository::<LibraryPrependPath>(); $body }
			ResourceType::LibraryAppendPath => { let $repo = $registry.repository::<LibraryAppendPath>(); $body }
			ResourceType::AppEnvironment => { let $repo = $registry.repository::<AppEnvironment>(); $body }
		}
	};
}

fn erase<E: CatalogEntity + Into<AnyResource>>(resources: Vec<E>) -> Vec<AnyResource> {
	resources.into_iter().map(Into::into).collect()
}

/// Every catalog repository behind one pool, addressed by [`ResourceType`].
#[derive(Clone)]
pub struct CatalogRegistry {
	sessions: SessionProvider,
}

impl CatalogRegistry {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			sessions: SessionProvider::new(pool),
		}
	}

	pub fn repository<E: CatalogEntity>(&self) -> CatalogRepository<E> {
		CatalogRepository::with_sessions(self.sessions.clone())
	}

	pub async fn get(&self, resource_type: ResourceType, key: &CatalogKey) -> Result<AnyResource> {
		dispatch!(self, resource_type, |repo| repo.get(key).await.map(Into::into))
	}

	pub async fn get_by_field(
		&self,
		resource_type: ResourceType,
		field: &str,
		value: FieldValue,
	) -> Result<Vec<AnyResource>> {
		dispatch!(self, resource_type, |repo| repo
			.get_by_field(field, value)
			.await
			.map(erase))
	}

	pub async fn get_all(&self, resource_type: ResourceType) -> Result<Vec<AnyResource>> {
		dispatch!(self, resource_type, |repo| repo.get_all().await.map(erase))
	}

	pub async fn get_all_ids(&self, resource_type: ResourceType) -> Result<Vec<String>> {
		dispatch!(self, resource_type, |repo| repo.get_all_ids().await)
	}

	pub async fn get_all_keys(&self, resource_type: ResourceType) -> Result<Vec<CatalogKey>> {
		dispatch!(self, resource_type, |repo| repo.get_all_keys().await)
	}

	pub async fn get_ids(
		&self,
		resource_type: ResourceType,
		field: &str,
		value: FieldValue,
	) -> Result<Vec<String>> {
		dispatch!(self, resource_type, |repo| repo.get_ids(field, value).await)
	}

	pub async fn is_exists(&self, resource_type: ResourceType, key: &CatalogKey) -> Result<bool> {
		dispatch!(self, resource_type, |repo| repo.is_exists(key).await)
	}

	pub async fn remove(&self, resource_type: ResourceType, key: &CatalogKey) -> Result<bool> {
		dispatch!(self, resource_type, |repo| repo.remove(key).await)
	}

	pub async fn save(&self, resource: AnyResource) -> Result<()> {
		dispatch!(self, resource.resource_type(), |repo| repo
			.save(&resource.try_into()?)
			.await)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::CatalogError;
	use crate::testing::create_catalog_test_pool;
	use crate::types::{
		DataMovementProtocol, JobManagerCommandType, JobSubmissionProtocol, MonitorMode,
		ResourceJobManagerType, SecurityProtocol,
	};
	use serde_json::Value;

	/// One resource per type; parents use the ids below and come earlier in
	/// `ResourceType::ALL`.
	fn sample(resource_type: ResourceType) -> AnyResource {
		let s = |v: &str| v.to_string();
		match resource_type {
			ResourceType::ComputeResource => ComputeResource {
				resource_id: s("stampede"),
				host_name: s("stampede.tacc.utexas.edu"),
				resource_description: Some(s("TACC Stampede")),
				max_memory_per_node: Some(96),
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::HostAlias => HostAlias {
				resource_id: s("stampede"),
				alias: s("login1"),
			}
			.into(),
			ResourceType::HostIpAddress => HostIpAddress {
				resource_id: s("stampede"),
				ip_address: s("129.114.0.1"),
			}
			.into(),
			ResourceType::ComputeResourceFileSystem => ComputeResourceFileSystem {
				compute_resource_id: s("stampede"),
				file_system: s("SCRATCH"),
				path: s("/scratch"),
			}
			.into(),
			ResourceType::BatchQueue => BatchQueue {
				compute_resource_id: s("stampede"),
				queue_name: s("normal"),
				queue_description: None,
				max_runtime: Some(2880),
				max_nodes: Some(256),
				max_processors: None,
				max_job_in_queue: Some(50),
				max_memory: None,
			}
			.into(),
			ResourceType::ResourceJobManager => ResourceJobManager {
				resource_job_manager_id: s("slurm1"),
				push_monitoring_endpoint: None,
				job_manager_bin_path: Some(s("/usr/bin")),
				resource_job_manager_type: ResourceJobManagerType::Slurm,
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::JobManagerCommand => JobManagerCommand {
				resource_job_manager_id: s("slurm1"),
				command_type: JobManagerCommandType::Submission,
				command: s("sbatch"),
			}
			.into(),
			ResourceType::JobSubmissionInterface => JobSubmissionInterface {
				compute_resource_id: s("stampede"),
				job_submission_interface_id: s("ssh-1"),
				job_submission_protocol: JobSubmissionProtocol::Ssh,
				priority_order: 1,
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::SshJobSubmission => SshJobSubmission {
				job_submission_interface_id: s("ssh-1"),
				resource_job_manager_id: s("slurm1"),
				security_protocol: SecurityProtocol::SshKeys,
				alternative_ssh_hostname: None,
				ssh_port: Some(22),
				monitor_mode: Some(MonitorMode::PollJobManager),
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::UnicoreJobSubmission => UnicoreJobSubmission {
				job_submission_interface_id: s("unicore-1"),
				security_protocol: SecurityProtocol::Gsi,
				unicore_endpoint_url: s("https://unicore.example.org:8080"),
			}
			.into(),
			ResourceType::DataMovementInterface => DataMovementInterface {
				compute_resource_id: s("stampede"),
				data_movement_interface_id: s("gridftp-1"),
				data_movement_protocol: DataMovementProtocol::GridFtp,
				priority_order: 0,
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::ScpDataMovement => ScpDataMovement {
				data_movement_interface_id: s("scp-1"),
				queue_description: None,
				security_protocol: SecurityProtocol::SshKeys,
				alternative_scp_hostname: Some(s("data.stampede.tacc.utexas.edu")),
				ssh_port: Some(22),
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::GridftpDataMovement => GridftpDataMovement {
				data_movement_interface_id: s("gridftp-1"),
				security_protocol: SecurityProtocol::Gsi,
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::GridftpEndpoint => GridftpEndpoint {
				data_movement_interface_id: s("gridftp-1"),
				endpoint: s("gsiftp://gridftp.stampede.tacc.utexas.edu:2811/"),
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::UnicoreDataMovement => UnicoreDataMovement {
				data_movement_interface_id: s("unicore-dm-1"),
				security_protocol: SecurityProtocol::Gsi,
				unicore_endpoint_url: s("https://unicore.example.org:8080/storage"),
			}
			.into(),
			ResourceType::StorageResource => StorageResource {
				storage_resource_id: s("ranch"),
				host_name: s("ranch.tacc.utexas.edu"),
				storage_resource_description: None,
				enabled: true,
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::StorageInterface => StorageInterface {
				storage_resource_id: s("ranch"),
				data_movement_interface_id: s("scp-1"),
				data_movement_protocol: DataMovementProtocol::Scp,
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::GatewayProfile => GatewayProfile {
				gateway_id: s("seagrid"),
				credential_store_token: Some(s("token-1")),
				identity_server_tenant: None,
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::StoragePreference => StoragePreference {
				gateway_id: s("seagrid"),
				storage_resource_id: s("ranch"),
				login_user_name: Some(s("seagrid")),
				file_system_root_location: Some(s("/archive")),
				resource_specific_credential_store_token: None,
			}
			.into(),
			ResourceType::GatewayClientCredential => GatewayClientCredential {
				client_key: s("client-1"),
				client_secret: s("secret"),
				gateway_id: s("seagrid"),
			}
			.into(),
			ResourceType::ApplicationModule => ApplicationModule {
				module_id: s("namd"),
				module_name: s("NAMD"),
				module_version: Some(s("2.14")),
				module_description: None,
				gateway_id: s("seagrid"),
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::ApplicationDeployment => ApplicationDeployment {
				deployment_id: s("namd-stampede"),
				app_module_id: s("namd"),
				compute_host_id: s("stampede"),
				executable_path: s("/opt/namd/namd2"),
				parallelism: s("MPI"),
				application_description: None,
				gateway_id: s("seagrid"),
				created_at: None,
				updated_at: None,
			}
			.into(),
			ResourceType::LibraryPrependPath => LibraryPrependPath {
				deployment_id: s("namd-stampede"),
				name: s("LD_LIBRARY_PATH"),
				value: s("/opt/namd/lib"),
			}
			.into(),
			ResourceType::LibraryAppendPath => LibraryAppendPath {
				deployment_id: s("namd-stampede"),
				name: s("PATH"),
				value: s("/opt/namd/bin"),
			}
			.into(),
			ResourceType::AppEnvironment => AppEnvironment {
				deployment_id: s("namd-stampede"),
				name: s("OMP_NUM_THREADS"),
				value: s("4"),
				env_order: Some(1),
			}
			.into(),
		}
	}

	/// JSON form of a resource without its bookkeeping timestamps.
	fn attributes(resource: &AnyResource) -> Value {
		let mut json = serde_json::to_value(resource).unwrap();
		if let Some(fields) = json["resource"].as_object_mut() {
			fields.remove("created_at");
			fields.remove("updated_at");
		}
		json
	}

	#[tokio::test]
	async fn test_unsupported_field_rejected_for_every_type() {
		let registry = CatalogRegistry::new(create_catalog_test_pool().await);
		for resource_type in ResourceType::ALL {
			let err = registry
				.get_by_field(*resource_type, "no_such_field", "x".into())
				.await
				.unwrap_err();
			assert!(
				matches!(err, CatalogError::InvalidArgument(_)),
				"{resource_type}: {err}"
			);
		}
	}

	#[tokio::test]
	async fn test_every_type_lists_empty_and_keys() {
		let registry = CatalogRegistry::new(create_catalog_test_pool().await);
		for resource_type in ResourceType::ALL {
			assert!(registry.get_all(*resource_type).await.unwrap().is_empty());
			assert!(registry.get_all_keys(*resource_type).await.unwrap().is_empty());
			let ids = registry.get_all_ids(*resource_type).await;
			match resource_type.descriptor().id_field {
				Some(_) => assert!(ids.unwrap().is_empty()),
				None => assert!(matches!(ids, Err(CatalogError::Unsupported(_)))),
			}
		}
	}

	#[tokio::test]
	async fn test_every_type_round_trips() {
		let registry = CatalogRegistry::new(create_catalog_test_pool().await);
		for resource_type in ResourceType::ALL {
			let resource = sample(*resource_type);
			let key = resource.key();
			registry.save(resource.clone()).await.unwrap();
			registry.save(resource.clone()).await.unwrap();

			let stored = registry.get(*resource_type, &key).await.unwrap();
			assert_eq!(attributes(&stored), attributes(&resource), "{resource_type}");
			assert!(registry.is_exists(*resource_type, &key).await.unwrap());
			assert_eq!(
				registry.get_all_keys(*resource_type).await.unwrap(),
				vec![key.clone()],
				"{resource_type}"
			);
			let reparsed: CatalogKey = key.to_string().parse().unwrap();
			assert!(registry.is_exists(*resource_type, &reparsed).await.unwrap());
		}
	}

	#[tokio::test]
	async fn test_dynamic_round_trip() {
		let registry = CatalogRegistry::new(create_catalog_test_pool().await);
		let manager: AnyResource = serde_json::from_value(serde_json::json!({
			"resource_type": "resource_job_manager",
			"resource": {
				"resource_job_manager_id": "pbs1",
				"push_monitoring_endpoint": null,
				"job_manager_bin_path": "/opt/pbs/bin",
				"resource_job_manager_type": "PBS"
			}
		}))
		.unwrap();
		registry.save(manager).await.unwrap();

		let key = CatalogKey::from("pbs1");
		let stored = registry
			.get(ResourceType::ResourceJobManager, &key)
			.await
			.unwrap();
		let AnyResource::ResourceJobManager(stored) = stored else {
			panic!("wrong resource type");
		};
		assert_eq!(stored.resource_job_manager_type, ResourceJobManagerType::Pbs);
		assert!(stored.created_at.is_some());

		assert_eq!(
			registry
				.get_all_ids(ResourceType::ResourceJobManager)
				.await
				.unwrap(),
			vec!["pbs1"]
		);
		assert!(registry
			.remove(ResourceType::ResourceJobManager, &key)
			.await
			.unwrap());
		assert!(!registry
			.is_exists(ResourceType::ResourceJobManager, &key)
			.await
			.unwrap());
	}
}
