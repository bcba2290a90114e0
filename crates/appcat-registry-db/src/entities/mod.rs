// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Catalog entity records and their table descriptors.

mod compute;
mod data_movement;
mod deployment;
mod job_manager;
mod storage;
mod submission;

pub use compute::{
	BatchQueue, ComputeResource, ComputeResourceFileSystem, HostAlias, HostIpAddress,
};
pub use data_movement::{
	DataMovementInterface, GridftpDataMovement, GridftpEndpoint, ScpDataMovement,
	UnicoreDataMovement,
};
pub use deployment::{
	AppEnvironment, ApplicationDeployment, ApplicationModule, LibraryAppendPath,
	LibraryPrependPath,
};
pub use job_manager::{JobManagerCommand, ResourceJobManager};
pub use storage::{
	GatewayClientCredential, GatewayProfile, StorageInterface, StoragePreference, StorageResource,
};
pub use submission::{JobSubmissionInterface, SshJobSubmission, UnicoreJobSubmission};
