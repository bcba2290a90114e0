// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parameterised statement generation keyed by entity descriptor.
//!
//! Column and table names only ever come from a static [`EntityDescriptor`];
//! caller-supplied field names are matched against it before use, and every
//! value is bound as a parameter.

use sqlx::{QueryBuilder, Sqlite};

use crate::error::{CatalogError, Result};
use crate::factory::ResourceType;
use crate::schema::{EntityDescriptor, CREATED_AT};
use crate::value::FieldValue;

pub struct QueryGenerator {
	descriptor: &'static EntityDescriptor,
	params: Vec<(&'static str, FieldValue)>,
}

impl QueryGenerator {
	pub fn new(descriptor: &'static EntityDescriptor) -> Self {
		Self {
			descriptor,
			params: Vec::new(),
		}
	}

	pub fn for_type(resource_type: ResourceType) -> Self {
		Self::new(resource_type.descriptor())
	}

	pub fn descriptor(&self) -> &'static EntityDescriptor {
		self.descriptor
	}

	/// Bind `field = value` into the WHERE clause. Binding a field twice
	/// replaces the earlier value.
	pub fn set_parameter(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<&mut Self> {
		let column = self.descriptor.column(field).ok_or_else(|| {
			CatalogError::InvalidArgument(format!(
				"unknown field '{field}' for {}",
				self.descriptor.resource_type
			))
		})?;
		self.params.retain(|(c, _)| *c != column);
		self.params.push((column, value.into()));
		Ok(self)
	}

	/// `SELECT <all columns> ... ORDER BY rowid`
	pub fn select_query(&self) -> QueryBuilder<'static, Sqlite> {
		self.select_columns_query(&self.descriptor.selectable_columns())
	}

	/// `SELECT <columns> ... ORDER BY rowid`
	pub fn select_columns_query(&self, columns: &[&str]) -> QueryBuilder<'static, Sqlite> {
		let mut builder = QueryBuilder::new("SELECT ");
		builder.push(columns.join(", "));
		builder.push(" FROM ");
		builder.push(self.descriptor.table);
		self.push_where(&mut builder);
		builder.push(" ORDER BY rowid");
		builder
	}

	/// `SELECT COUNT(*) ...`
	pub fn count_query(&self) -> QueryBuilder<'static, Sqlite> {
		let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
		builder.push(self.descriptor.table);
		self.push_where(&mut builder);
		builder
	}

	/// `DELETE ...`
	pub fn delete_query(&self) -> QueryBuilder<'static, Sqlite> {
		let mut builder = QueryBuilder::new("DELETE FROM ");
		builder.push(self.descriptor.table);
		self.push_where(&mut builder);
		builder
	}

	/// `INSERT INTO <table> (<columns>) VALUES (...)`; bound parameters are ignored.
	pub fn insert_query(&self, row: Vec<(&'static str, FieldValue)>) -> QueryBuilder<'static, Sqlite> {
		let mut builder = QueryBuilder::new("INSERT INTO ");
		builder.push(self.descriptor.table);
		builder.push(" (");
		builder.push(
			row
				.iter()
				.map(|(column, _)| *column)
				.collect::<Vec<_>>()
				.join(", "),
		);
		builder.push(") VALUES (");
		for (i, (_, value)) in row.into_iter().enumerate() {
			if i > 0 {
				builder.push(", ");
			}
			value.push_bind(&mut builder);
		}
		builder.push(")");
		builder
	}

	/// `INSERT ... ON CONFLICT (<key fields>) DO UPDATE SET <column> = excluded.<column>, ...`
	///
	/// On conflict every non-key column of `row` except `created_at` is taken
	/// from the new row, and each `touched` assignment is bound on top. With
	/// nothing to assign the conflict is ignored.
	pub fn upsert_query(
		&self,
		row: Vec<(&'static str, FieldValue)>,
		touched: Vec<(&'static str, FieldValue)>,
	) -> QueryBuilder<'static, Sqlite> {
		let merged: Vec<&'static str> = row
			.iter()
			.map(|(column, _)| *column)
			.filter(|column| !self.descriptor.is_key_field(column) && *column != CREATED_AT)
			.collect();

		let mut builder = self.insert_query(row);
		builder.push(" ON CONFLICT (");
		builder.push(self.descriptor.key_fields.join(", "));
		builder.push(")");
		if merged.is_empty() && touched.is_empty() {
			builder.push(" DO NOTHING");
			return builder;
		}

		builder.push(" DO UPDATE SET ");
		builder.push(
			merged
				.iter()
				.map(|column| format!("{column} = excluded.{column}"))
				.collect::<Vec<_>>()
				.join(", "),
		);
		for (i, (column, value)) in touched.into_iter().enumerate() {
			if i > 0 || !merged.is_empty() {
				builder.push(", ");
			}
			builder.push(column);
			builder.push(" = ");
			value.push_bind(&mut builder);
		}
		builder
	}

	fn push_where(&self, builder: &mut QueryBuilder<'static, Sqlite>) {
		for (i, (column, value)) in self.params.iter().enumerate() {
			builder.push(if i == 0 { " WHERE " } else { " AND " });
			builder.push(*column);
			if value.is_null() {
				builder.push(" IS NULL");
			} else {
				builder.push(" = ");
				value.clone().push_bind(builder);
			}
		}
	}
}
