// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entity-type tags and the type-erased resource value.
//!
//! [`ResourceType`] names every catalog entity and resolves to its
//! descriptor. [`AnyResource`] carries one resource of any type so callers
//! that only know the tag at runtime (the registry facade, the CLI) can move
//! resources around and hand them back to the typed repositories.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use std::fmt;
use std::str::FromStr;

use crate::entities::*;
use crate::error::{CatalogError, Result};
use crate::key::CatalogKey;
use crate::schema::{CatalogEntity, EntityDescriptor};

macro_rules! catalog_resources {
	($($variant:ident => $tag:literal),+ $(,)?) => {
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(rename_all = "snake_case")]
		pub enum ResourceType {
			$($variant,)+
		}

		impl ResourceType {
			pub const ALL: &'static [ResourceType] = &[$(ResourceType::$variant),+];

			pub fn as_str(&self) -> &'static str {
				match self {
					$(ResourceType::$variant => $tag,)+
				}
			}

			pub fn descriptor(&self) -> &'static EntityDescriptor {
				match self {
					$(ResourceType::$variant => <$variant as CatalogEntity>::DESCRIPTOR,)+
				}
			}

			/// Decode a row selected with this type's columns.
			pub fn from_row(&self, row: &SqliteRow) -> Result<AnyResource> {
				match self {
					$(ResourceType::$variant => $variant::from_row(row).map(AnyResource::$variant),)+
				}
			}
		}

		impl FromStr for ResourceType {
			type Err = CatalogError;

			fn from_str(s: &str) -> Result<Self> {
				match s {
					$($tag => Ok(ResourceType::$variant),)+
					_ => Err(CatalogError::InvalidArgument(format!("unknown resource type: {s}"))),
				}
			}
		}

		/// One catalog resource of any type.
		#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
		#[serde(tag = "resource_type", content = "resource", rename_all = "snake_case")]
		pub enum AnyResource {
			$($variant($variant),)+
		}

		impl AnyResource {
			pub fn resource_type(&self) -> ResourceType {
				match self {
					$(AnyResource::$variant(_) => ResourceType::$variant,)+
				}
			}

			pub fn key(&self) -> CatalogKey {
				match self {
					$(AnyResource::$variant(r) => r.key(),)+
				}
			}
		}

		$(
			impl From<$variant> for AnyResource {
				fn from(resource: $variant) -> Self {
					AnyResource::$variant(resource)
				}
			}

			impl TryFrom<AnyResource> for $variant {
				type Error = CatalogError;

				fn try_from(resource: AnyResource) -> Result<Self> {
					match resource {
						AnyResource::$variant(r) => Ok(r),
						other => Err(CatalogError::InvalidArgument(format!(
							"expected {}, got {}",
							$tag,
							other.resource_type()
						))),
					}
				}
			}
		)+
	};
}

catalog_resources! {
	ComputeResource => "compute_resource",
	HostAlias => "host_alias",
	HostIpAddress => "host_ip_address",
	ComputeResourceFileSystem => "compute_resource_file_system",
	BatchQueue => "batch_queue",
	ResourceJobManager => "resource_job_manager",
	JobManagerCommand => "job_manager_command",
	JobSubmissionInterface => "job_submission_interface",
	SshJobSubmission => "ssh_job_submission",
	UnicoreJobSubmission => "unicore_job_submission",
	DataMovementInterface => "data_movement_interface",
	ScpDataMovement => "scp_data_movement",
	GridftpDataMovement => "gridftp_data_movement",
	GridftpEndpoint => "gridftp_endpoint",
	UnicoreDataMovement => "unicore_data_movement",
	StorageResource => "storage_resource",
	StorageInterface => "storage_interface",
	GatewayProfile => "gateway_profile",
	StoragePreference => "storage_preference",
	GatewayClientCredential => "gateway_client_credential",
	ApplicationModule => "application_module",
	ApplicationDeployment => "application_deployment",
	LibraryPrependPath => "library_prepend_path",
	LibraryAppendPath => "library_append_path",
	AppEnvironment => "app_environment",
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
