// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Generic CRUD repository for catalog entities.
//!
//! One [`CatalogRepository`] serves every entity type; the entity's
//! [`EntityDescriptor`](crate::schema::EntityDescriptor) supplies table,
//! key, filter and parent information.
//!
//! # Upsert
//!
//! `save` is a single `INSERT ... ON CONFLICT` on the primary key, run in
//! one transaction. A new row gets `created_at`; an existing row has its
//! non-key columns overwritten and `updated_at` set, leaving `created_at`
//! alone. Concurrent saves of one key serialize on the write lock and the
//! last writer wins. Parent foreign keys are checked in the same
//! transaction, which rolls back when one is missing.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::Row;
use std::marker::PhantomData;

use crate::error::{CatalogError, Result};
use crate::key::CatalogKey;
use crate::query::QueryGenerator;
use crate::schema::{CatalogEntity, CREATED_AT, UPDATED_AT};
use crate::session::SessionProvider;
use crate::value::FieldValue;

/// The operations every catalog resource supports.
#[async_trait]
pub trait CatalogStore<E: CatalogEntity>: Send + Sync {
	async fn remove(&self, key: &CatalogKey) -> Result<bool>;
	async fn get(&self, key: &CatalogKey) -> Result<E>;
	async fn get_by_field(&self, field: &str, value: FieldValue) -> Result<Vec<E>>;
	async fn get_all(&self) -> Result<Vec<E>>;
	async fn get_all_ids(&self) -> Result<Vec<String>>;
	async fn get_all_keys(&self) -> Result<Vec<CatalogKey>>;
	async fn get_ids(&self, field: &str, value: FieldValue) -> Result<Vec<String>>;
	async fn save(&self, resource: &E) -> Result<()>;
	async fn is_exists(&self, key: &CatalogKey) -> Result<bool>;
}

pub struct CatalogRepository<E> {
	sessions: SessionProvider,
	_entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CatalogRepository<E> {
	fn clone(&self) -> Self {
		Self {
			sessions: self.sessions.clone(),
			_entity: PhantomData,
		}
	}
}

impl<E: CatalogEntity> CatalogRepository<E> {
	pub fn new(pool: SqlitePool) -> Self {
		Self::with_sessions(SessionProvider::new(pool))
	}

	pub fn with_sessions(sessions: SessionProvider) -> Self {
		Self {
			sessions,
			_entity: PhantomData,
		}
	}

	fn key_query(key: &CatalogKey) -> Result<QueryGenerator> {
		let mut generator = QueryGenerator::new(E::DESCRIPTOR);
		for (field, value) in key.resolve(E::DESCRIPTOR.key_fields)? {
			generator.set_parameter(field, value)?;
		}
		Ok(generator)
	}

	fn field_query(field: &str, value: FieldValue) -> Result<QueryGenerator> {
		let field = E::DESCRIPTOR.check_filter_field(field)?;
		let mut generator = QueryGenerator::new(E::DESCRIPTOR);
		generator.set_parameter(field, value)?;
		Ok(generator)
	}

	async fn fetch(&self, generator: &QueryGenerator) -> Result<Vec<E>> {
		let rows = generator
			.select_query()
			.build()
			.fetch_all(self.sessions.pool())
			.await?;
		let mut resources = rows.iter().map(E::from_row).collect::<Result<Vec<_>>>()?;
		E::sort_results(&mut resources);
		Ok(resources)
	}

	/// Ids come back in the same order as the full listing.
	async fn fetch_ids(&self, generator: &QueryGenerator) -> Result<Vec<String>> {
		let id_field = E::DESCRIPTOR.require_id_field()?;
		self
			.fetch(generator)
			.await?
			.iter()
			.map(|resource| match resource.field_value(id_field) {
				Some(FieldValue::Text(id)) => Ok(id),
				other => Err(CatalogError::Internal(format!(
					"{} id field '{id_field}' holds {other:?}",
					E::DESCRIPTOR.resource_type
				))),
			})
			.collect()
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn remove(&self, key: &CatalogKey) -> Result<bool> {
		let generator = Self::key_query(key)?;
		let mut session = self.sessions.session().await?;
		let result = generator
			.delete_query()
			.build()
			.execute(session.conn())
			.await?;
		session.commit().await?;
		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn get(&self, key: &CatalogKey) -> Result<E> {
		let generator = Self::key_query(key)?;
		self
			.fetch(&generator)
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| {
				CatalogError::NotFound(format!("{} '{key}'", E::DESCRIPTOR.resource_type))
			})
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn get_by_field(&self, field: &str, value: FieldValue) -> Result<Vec<E>> {
		let generator = Self::field_query(field, value)?;
		self.fetch(&generator).await
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn get_all(&self) -> Result<Vec<E>> {
		self.fetch(&QueryGenerator::new(E::DESCRIPTOR)).await
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn get_all_ids(&self) -> Result<Vec<String>> {
		self.fetch_ids(&QueryGenerator::new(E::DESCRIPTOR)).await
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn get_all_keys(&self) -> Result<Vec<CatalogKey>> {
		let key_fields = E::DESCRIPTOR.key_fields;
		let rows = QueryGenerator::new(E::DESCRIPTOR)
			.select_columns_query(key_fields)
			.build()
			.fetch_all(self.sessions.pool())
			.await?;
		rows
			.iter()
			.map(|row| {
				key_fields.iter().try_fold(CatalogKey::new(), |key, field| {
					let value: String = row.try_get(*field)?;
					Ok::<_, CatalogError>(key.with(*field, value))
				})
			})
			.collect()
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn get_ids(&self, field: &str, value: FieldValue) -> Result<Vec<String>> {
		E::DESCRIPTOR.require_id_field()?;
		let generator = Self::field_query(field, value)?;
		self.fetch_ids(&generator).await
	}

	#[tracing::instrument(
		skip(self, resource),
		fields(entity = E::DESCRIPTOR.resource_type.as_str(), key = %resource.key()),
		err
	)]
	pub async fn save(&self, resource: &E) -> Result<()> {
		let descriptor = E::DESCRIPTOR;
		let now = Utc::now();
		let mut row: Vec<(&'static str, FieldValue)> =
			descriptor.columns.iter().copied().zip(resource.values()).collect();
		let mut touched = Vec::new();
		if descriptor.timestamps {
			row.push((CREATED_AT, now.into()));
			touched.push((UPDATED_AT, now.into()));
		}

		let mut session = self.sessions.session().await?;
		// The write runs before any read so the transaction takes the write
		// lock without holding a snapshot; a missing parent is reported after.
		let written = QueryGenerator::new(descriptor)
			.upsert_query(row, touched)
			.build()
			.execute(session.conn())
			.await;
		Self::check_parents(session.conn(), resource).await?;
		let result = written?;
		tracing::debug!(rows = result.rows_affected(), "upserted record");

		session.commit().await
	}

	#[tracing::instrument(skip(self), fields(entity = E::DESCRIPTOR.resource_type.as_str()), err)]
	pub async fn is_exists(&self, key: &CatalogKey) -> Result<bool> {
		let count: i64 = Self::key_query(key)?
			.count_query()
			.build_query_scalar::<i64>()
			.fetch_one(self.sessions.pool())
			.await?;
		Ok(count > 0)
	}

	async fn check_parents(conn: &mut SqliteConnection, resource: &E) -> Result<()> {
		for parent_ref in E::DESCRIPTOR.parents {
			let value = resource
				.field_value(parent_ref.field)
				.unwrap_or(FieldValue::Null);
			if value.is_null() {
				continue;
			}
			let parent = parent_ref.parent.descriptor();
			let mut generator = QueryGenerator::new(parent);
			generator.set_parameter(parent.key_fields[0], value.clone())?;
			let count: i64 = generator
				.count_query()
				.build_query_scalar::<i64>()
				.fetch_one(&mut *conn)
				.await?;
			if count == 0 {
				return Err(CatalogError::NotFound(format!(
					"{} '{value}' referenced by {}",
					parent.resource_type, parent_ref.field
				)));
			}
		}
		Ok(())
	}
}

#[async_trait]
impl<E: CatalogEntity> CatalogStore<E> for CatalogRepository<E> {
	async fn remove(&self, key: &CatalogKey) -> Result<bool> {
		self.remove(key).await
	}

	async fn get(&self, key: &CatalogKey) -> Result<E> {
		self.get(key).await
	}

	async fn get_by_field(&self, field: &str, value: FieldValue) -> Result<Vec<E>> {
		self.get_by_field(field, value).await
	}

	async fn get_all(&self) -> Result<Vec<E>> {
		self.get_all().await
	}

	async fn get_all_ids(&self) -> Result<Vec<String>> {
		self.get_all_ids().await
	}

	async fn get_all_keys(&self) -> Result<Vec<CatalogKey>> {
		self.get_all_keys().await
	}

	async fn get_ids(&self, field: &str, value: FieldValue) -> Result<Vec<String>> {
		self.get_ids(field, value).await
	}

	async fn save(&self, resource: &E) -> Result<()> {
		self.save(resource).await
	}

	async fn is_exists(&self, key: &CatalogKey) -> Result<bool> {
		self.is_exists(key).await
	}
}
