// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative per-entity schema descriptors.
//!
//! Every catalog entity describes its table once, as an [`EntityDescriptor`],
//! and implements [`CatalogEntity`] to convert between a row and its
//! resource value. The generic repository needs nothing else.

use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::error::{CatalogError, Result};
use crate::factory::ResourceType;
use crate::key::CatalogKey;
use crate::value::FieldValue;

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// A foreign key resolved against its parent table on every save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
	/// Column on the child holding the parent's key.
	pub field: &'static str,
	/// Parent entity; must have a simple key.
	pub parent: ResourceType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
	pub resource_type: ResourceType,
	pub table: &'static str,
	/// Persisted columns, excluding timestamps, in `CatalogEntity::values` order.
	pub columns: &'static [&'static str],
	/// Ordered primary key columns.
	pub key_fields: &'static [&'static str],
	/// Fields accepted by `get_by_field` and `get_ids`.
	pub filter_fields: &'static [&'static str],
	/// Natural scalar identifier returned by id listings, if the entity has one.
	pub id_field: Option<&'static str>,
	pub parents: &'static [ParentRef],
	/// Whether `created_at` / `updated_at` are maintained.
	pub timestamps: bool,
}

impl EntityDescriptor {
	/// Columns read back on select, timestamps last.
	pub fn selectable_columns(&self) -> Vec<&'static str> {
		let mut columns = self.columns.to_vec();
		if self.timestamps {
			columns.push(CREATED_AT);
			columns.push(UPDATED_AT);
		}
		columns
	}

	/// Look up a selectable column by name.
	pub fn column(&self, name: &str) -> Option<&'static str> {
		self.selectable_columns().into_iter().find(|c| *c == name)
	}

	pub fn is_key_field(&self, name: &str) -> bool {
		self.key_fields.contains(&name)
	}

	/// Rejects field names outside the filter allow-list.
	pub fn check_filter_field(&self, name: &str) -> Result<&'static str> {
		self
			.filter_fields
			.iter()
			.find(|f| **f == name)
			.copied()
			.ok_or_else(|| {
				CatalogError::InvalidArgument(format!(
					"unsupported field name '{name}' for {} (allowed: {})",
					self.resource_type,
					self.filter_fields.join(", ")
				))
			})
	}

	/// The natural id column, or `Unsupported` for entities without one.
	pub fn require_id_field(&self) -> Result<&'static str> {
		self.id_field.ok_or_else(|| {
			CatalogError::Unsupported(format!(
				"{} has no natural identifier; list keys instead",
				self.resource_type
			))
		})
	}
}

/// A catalog entity: a schema descriptor plus row conversion.
pub trait CatalogEntity:
	Clone + Send + Sync + Unpin + Serialize + DeserializeOwned + 'static
{
	const DESCRIPTOR: &'static EntityDescriptor;

	/// Decode one selected row.
	fn from_row(row: &SqliteRow) -> Result<Self>;

	/// Values for `DESCRIPTOR.columns`, in order.
	fn values(&self) -> Vec<FieldValue>;

	/// Reorder a listing. Query order is kept unless overridden.
	fn sort_results(_resources: &mut [Self]) {}

	/// Value of a persisted column by name.
	fn field_value(&self, name: &str) -> Option<FieldValue> {
		Self::DESCRIPTOR
			.columns
			.iter()
			.position(|c| *c == name)
			.and_then(|i| self.values().into_iter().nth(i))
	}

	/// This resource's primary key, with every component named.
	fn key(&self) -> CatalogKey {
		Self::DESCRIPTOR
			.key_fields
			.iter()
			.fold(CatalogKey::new(), |key, field| {
				key.with(*field, self.field_value(field).unwrap_or(FieldValue::Null))
			})
	}
}

/// Decode an upper-case text column into one of the enumerated attribute types.
pub(crate) fn decode_enum<T>(row: &SqliteRow, column: &str) -> Result<T>
where
	T: FromStr<Err = String>,
{
	let text: String = row.try_get(column)?;
	text.parse().map_err(CatalogError::Internal)
}

pub(crate) fn decode_optional_enum<T>(row: &SqliteRow, column: &str) -> Result<Option<T>>
where
	T: FromStr<Err = String>,
{
	let text: Option<String> = row.try_get(column)?;
	text
		.map(|t| t.parse().map_err(CatalogError::Internal))
		.transpose()
}
