// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Enumerated attribute types stored as upper-case text columns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::FieldValue;

macro_rules! define_text_enum {
	($name:ident, $doc:expr, { $($variant:ident => $text:literal),+ $(,)? }) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub enum $name {
			$(
				#[serde(rename = $text)]
				$variant,
			)+
		}

		impl $name {
			/// Every variant, in declaration order.
			pub fn all() -> &'static [$name] {
				&[$($name::$variant),+]
			}

			pub fn as_str(&self) -> &'static str {
				match self {
					$($name::$variant => $text,)+
				}
			}
		}

		impl std::str::FromStr for $name {
			type Err = String;

			fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
				match s {
					$($text => Ok($name::$variant),)+
					_ => Err(format!("unknown {}: {s}", stringify!($name))),
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl From<$name> for FieldValue {
			fn from(value: $name) -> Self {
				FieldValue::Text(value.as_str().to_string())
			}
		}
	};
}

define_text_enum!(ResourceJobManagerType, "Batch system fronting a compute resource.", {
	Fork => "FORK",
	Pbs => "PBS",
	Slurm => "SLURM",
	Lsf => "LSF",
	Uge => "UGE",
	Cloud => "CLOUD",
	AiravataCustom => "AIRAVATA_CUSTOM",
	HtCondor => "HTCONDOR",
});

define_text_enum!(JobManagerCommandType, "Purpose of a job manager command.", {
	Submission => "SUBMISSION",
	JobMonitoring => "JOB_MONITORING",
	Deletion => "DELETION",
	CheckJob => "CHECK_JOB",
	ShowQueue => "SHOW_QUEUE",
	ShowReservation => "SHOW_RESERVATION",
	ShowStart => "SHOW_START",
});

define_text_enum!(SecurityProtocol, "Credential scheme used to reach a resource.", {
	UsernamePassword => "USERNAME_PASSWORD",
	SshKeys => "SSH_KEYS",
	Gsi => "GSI",
	Kerberos => "KERBEROS",
	Oauth => "OAUTH",
	Local => "LOCAL",
});

define_text_enum!(JobSubmissionProtocol, "Transport used to submit jobs.", {
	Local => "LOCAL",
	Ssh => "SSH",
	Globus => "GLOBUS",
	Unicore => "UNICORE",
	Cloud => "CLOUD",
	SshFork => "SSH_FORK",
	LocalFork => "LOCAL_FORK",
});

define_text_enum!(DataMovementProtocol, "Transport used to stage data.", {
	Local => "LOCAL",
	Scp => "SCP",
	Sftp => "SFTP",
	GridFtp => "GRID_FTP",
	UnicoreStorageService => "UNICORE_STORAGE_SERVICE",
});

define_text_enum!(MonitorMode, "How submitted jobs are monitored.", {
	PollJobManager => "POLL_JOB_MANAGER",
	CloudJobMonitor => "CLOUD_JOB_MONITOR",
	JobEmailNotificationMonitor => "JOB_EMAIL_NOTIFICATION_MONITOR",
	XsedeAmqpSubscribe => "XSEDE_AMQP_SUBSCRIBE",
	Fork => "FORK",
});

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	#[test]
	fn test_every_variant_parses_back() {
		for kind in ResourceJobManagerType::all() {
			assert_eq!(ResourceJobManagerType::from_str(kind.as_str()), Ok(*kind));
		}
		for protocol in DataMovementProtocol::all() {
			assert_eq!(DataMovementProtocol::from_str(protocol.as_str()), Ok(*protocol));
		}
	}

	#[test]
	fn test_unknown_text_is_rejected() {
		let err = SecurityProtocol::from_str("ssh_keys").unwrap_err();
		assert!(err.contains("SecurityProtocol"));
	}

	#[test]
	fn test_serde_uses_stored_text() {
		let json = serde_json::to_string(&JobSubmissionProtocol::SshFork).unwrap();
		assert_eq!(json, "\"SSH_FORK\"");
		let parsed: MonitorMode = serde_json::from_str("\"POLL_JOB_MANAGER\"").unwrap();
		assert_eq!(parsed, MonitorMode::PollJobManager);
	}

	#[test]
	fn test_into_field_value() {
		let value: FieldValue = ResourceJobManagerType::Pbs.into();
		assert_eq!(value, FieldValue::Text("PBS".to_string()));
	}
}
