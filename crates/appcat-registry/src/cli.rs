// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Catalog commands and their JSON output.

use anyhow::{bail, Context};
use appcat_registry_db::{AnyResource, CatalogKey, CatalogRegistry, FieldValue, ResourceType};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
	/// List every resource type tag with its key fields
	Types,
	/// Fetch one resource by key
	Get(KeyArgs),
	/// List resources, optionally filtered by one field
	List(FilterArgs),
	/// List natural identifiers, optionally filtered by one field
	Ids(FilterArgs),
	/// List every primary key of a resource type
	Keys {
		resource_type: ResourceType,
	},
	/// Check whether a resource exists
	Exists(KeyArgs),
	/// Delete a resource by key
	Remove(KeyArgs),
	/// Insert or update one resource given as a JSON object ("-" reads stdin)
	Save {
		resource_type: ResourceType,
		json: String,
	},
}

#[derive(Args, Debug)]
pub struct KeyArgs {
	pub resource_type: ResourceType,
	/// A bare value for simple keys, or field=value per key field
	#[arg(required = true)]
	pub key: Vec<String>,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
	pub resource_type: ResourceType,
	#[arg(long, requires = "value")]
	pub field: Option<String>,
	#[arg(long, requires = "field")]
	pub value: Option<String>,
}

impl FilterArgs {
	fn filter(&self) -> Option<(&str, FieldValue)> {
		self
			.field
			.as_deref()
			.zip(self.value.as_deref())
			.map(|(field, value)| (field, parse_field_value(value)))
	}
}

/// Build a key from command-line components, in the text form `keys` prints.
pub fn parse_key(parts: &[String]) -> anyhow::Result<CatalogKey> {
	match parts {
		[] => bail!("a key is required"),
		[single] => Ok(single.parse::<CatalogKey>()?),
		_ => {
			if let Some(part) = parts.iter().find(|part| !part.contains('=')) {
				bail!("expected field=value, got '{part}'");
			}
			Ok(parts.join(",").parse::<CatalogKey>()?)
		}
	}
}

/// Filter values arrive as text; booleans are the one case SQLite will not coerce.
pub fn parse_field_value(value: &str) -> FieldValue {
	match value {
		"true" => FieldValue::Bool(true),
		"false" => FieldValue::Bool(false),
		other => FieldValue::from(other),
	}
}

fn keys_json(keys: Vec<CatalogKey>) -> Value {
	Value::Array(keys.iter().map(|k| Value::String(k.to_string())).collect())
}

#[tracing::instrument(skip_all)]
pub async fn execute(registry: &CatalogRegistry, command: CatalogCommand) -> anyhow::Result<Value> {
	let output = match command {
		CatalogCommand::Types => Value::Array(
			ResourceType::ALL
				.iter()
				.map(|t| {
					let descriptor = t.descriptor();
					json!({
						"resource_type": t.as_str(),
						"table": descriptor.table,
						"key_fields": descriptor.key_fields,
						"filter_fields": descriptor.filter_fields,
						"id_field": descriptor.id_field,
					})
				})
				.collect(),
		),
		CatalogCommand::Get(args) => {
			let key = parse_key(&args.key)?;
			serde_json::to_value(registry.get(args.resource_type, &key).await?)?
		}
		CatalogCommand::List(args) => {
			let resources = match args.filter() {
				Some((field, value)) => {
					registry
						.get_by_field(args.resource_type, field, value)
						.await?
				}
				None => registry.get_all(args.resource_type).await?,
			};
			serde_json::to_value(resources)?
		}
		CatalogCommand::Ids(args) => {
			let ids = match args.filter() {
				Some((field, value)) => registry.get_ids(args.resource_type, field, value).await?,
				None => registry.get_all_ids(args.resource_type).await?,
			};
			json!(ids)
		}
		CatalogCommand::Keys { resource_type } => {
			keys_json(registry.get_all_keys(resource_type).await?)
		}
		CatalogCommand::Exists(args) => {
			let key = parse_key(&args.key)?;
			json!({ "exists": registry.is_exists(args.resource_type, &key).await? })
		}
		CatalogCommand::Remove(args) => {
			let key = parse_key(&args.key)?;
			json!({ "removed": registry.remove(args.resource_type, &key).await? })
		}
		CatalogCommand::Save {
			resource_type,
			json,
		} => {
			let body = if json == "-" {
				std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
			} else {
				json
			};
			let body: Value = serde_json::from_str(&body).context("resource is not valid JSON")?;
			let resource: AnyResource = serde_json::from_value(json!({
				"resource_type": resource_type.as_str(),
				"resource": body,
			}))
			.with_context(|| format!("resource does not match {resource_type}"))?;
			let key = resource.key();
			registry.save(resource).await?;
			tracing::info!(%resource_type, %key, "resource saved");
			json!({ "saved": key.to_string() })
		}
	};
	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use appcat_registry_db::{create_pool, run_migrations};
	use std::time::Duration;

	async fn registry(dir: &tempfile::TempDir) -> CatalogRegistry {
		let url = format!("sqlite:{}", dir.path().join("catalog.db").display());
		let pool = create_pool(&url, 1, Duration::from_secs(5)).await.unwrap();
		run_migrations(&pool).await.unwrap();
		CatalogRegistry::new(pool)
	}

	fn strings(parts: &[&str]) -> Vec<String> {
		parts.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn test_parse_key_forms() {
		assert!(parse_key(&strings(&["pbs1"])).unwrap().is_scalar());
		let key = parse_key(&strings(&["deployment_id=d1", "name=PATH"])).unwrap();
		assert_eq!(key.to_string(), "deployment_id=d1,name=PATH");
		assert!(parse_key(&strings(&["d1", "PATH"])).is_err());

		let escaped = CatalogKey::new()
			.with("data_movement_interface_id", "gridftp-1")
			.with("endpoint", "gsiftp://host:2811/a=b,c");
		assert_eq!(parse_key(&[escaped.to_string()]).unwrap(), escaped);
		assert!(parse_key(&[]).is_err());
	}

	#[test]
	fn test_parse_field_value() {
		assert_eq!(parse_field_value("true"), FieldValue::Bool(true));
		assert_eq!(parse_field_value("PBS"), FieldValue::from("PBS"));
	}

	#[tokio::test]
	async fn test_save_get_remove_through_cli() {
		let dir = tempfile::tempdir().unwrap();
		let registry = registry(&dir).await;

		let saved = execute(
			&registry,
			CatalogCommand::Save {
				resource_type: ResourceType::ResourceJobManager,
				json: r#"{"resource_job_manager_id":"pbs1","push_monitoring_endpoint":null,"job_manager_bin_path":"/opt/pbs/bin","resource_job_manager_type":"PBS"}"#.to_string(),
			},
		)
		.await
		.unwrap();
		assert_eq!(saved["saved"], "resource_job_manager_id=pbs1");

		let fetched = execute(
			&registry,
			CatalogCommand::Get(KeyArgs {
				resource_type: ResourceType::ResourceJobManager,
				key: strings(&["pbs1"]),
			}),
		)
		.await
		.unwrap();
		assert_eq!(fetched["resource"]["job_manager_bin_path"], "/opt/pbs/bin");

		let ids = execute(
			&registry,
			CatalogCommand::Ids(FilterArgs {
				resource_type: ResourceType::ResourceJobManager,
				field: Some("resource_job_manager_type".to_string()),
				value: Some("PBS".to_string()),
			}),
		)
		.await
		.unwrap();
		assert_eq!(ids, json!(["pbs1"]));

		let removed = execute(
			&registry,
			CatalogCommand::Remove(KeyArgs {
				resource_type: ResourceType::ResourceJobManager,
				key: strings(&["pbs1"]),
			}),
		)
		.await
		.unwrap();
		assert_eq!(removed["removed"], true);
	}

	#[tokio::test]
	async fn test_printed_keys_resolve_with_reserved_characters() {
		let dir = tempfile::tempdir().unwrap();
		let registry = registry(&dir).await;
		execute(
			&registry,
			CatalogCommand::Save {
				resource_type: ResourceType::GatewayProfile,
				json: r#"{"gateway_id":"a=b,c","credential_store_token":null,"identity_server_tenant":null}"#.to_string(),
			},
		)
		.await
		.unwrap();

		let keys = execute(
			&registry,
			CatalogCommand::Keys {
				resource_type: ResourceType::GatewayProfile,
			},
		)
		.await
		.unwrap();
		let printed = keys[0].as_str().unwrap().to_string();

		let exists = execute(
			&registry,
			CatalogCommand::Exists(KeyArgs {
				resource_type: ResourceType::GatewayProfile,
				key: vec![printed],
			}),
		)
		.await
		.unwrap();
		assert_eq!(exists["exists"], true);
	}

	#[tokio::test]
	async fn test_types_lists_every_tag() {
		let dir = tempfile::tempdir().unwrap();
		let output = execute(&registry(&dir).await, CatalogCommand::Types)
			.await
			.unwrap();
		assert_eq!(output.as_array().unwrap().len(), ResourceType::ALL.len());
	}
}
