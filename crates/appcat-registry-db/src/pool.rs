// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

use crate::error::CatalogError;

/// Create a SqlitePool with WAL mode, enforced foreign keys and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./appcat.db")
/// * `max_connections` - Upper bound on pooled connections
/// * `busy_timeout` - How long a connection waits on a locked database
///
/// # Errors
/// Returns `CatalogError::InvalidArgument` if the URL is invalid, or
/// `CatalogError::Storage` if the connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(
	database_url: &str,
	max_connections: u32,
	busy_timeout: Duration,
) -> Result<SqlitePool, CatalogError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| CatalogError::InvalidArgument(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.busy_timeout(busy_timeout)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(max_connections)
		.connect_with(options)
		.await?;

	tracing::debug!(max_connections, "database pool created");
	Ok(pool)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_invalid_url_is_rejected() {
		let result = create_pool("sqlite:catalog.db?mode=bogus", 1, Duration::from_secs(1)).await;
		assert!(matches!(result, Err(CatalogError::InvalidArgument(_))));
	}

	#[tokio::test]
	async fn test_file_pool_enforces_foreign_keys() {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("catalog.db").display());
		let pool = create_pool(&url, 2, Duration::from_secs(5)).await.unwrap();

		let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
			.fetch_one(&pool)
			.await
			.unwrap();
		assert_eq!(enabled, 1);
	}
}
