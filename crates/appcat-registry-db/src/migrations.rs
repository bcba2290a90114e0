// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;

use crate::error::CatalogError;

const APP_CATALOG_SCHEMA: &str = include_str!("../migrations/001_app_catalog.sql");

/// Apply the catalog schema.
///
/// # Note
/// Migrations are idempotent - safe to run multiple times.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), CatalogError> {
	let mut applied = 0usize;
	for stmt in APP_CATALOG_SCHEMA
		.split(';')
		.filter(|s| !s.trim().is_empty())
	{
		if let Err(e) = sqlx::query(stmt).execute(pool).await {
			let msg = e.to_string();
			if !msg.contains("already exists") {
				return Err(e.into());
			}
		}
		applied += 1;
	}
	tracing::info!(statements = applied, "catalog migrations applied");
	Ok(())
}
