// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scoped write sessions over the catalog pool.

use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::{Sqlite, Transaction};

use crate::error::Result;

/// Hands out pooled connections and transactional sessions.
#[derive(Clone)]
pub struct SessionProvider {
	pool: SqlitePool,
}

impl SessionProvider {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Pool used for single-statement reads.
	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Begin a transaction. Dropping the session without `commit` rolls it back.
	pub async fn session(&self) -> Result<CatalogSession> {
		let tx = self.pool.begin().await?;
		Ok(CatalogSession { tx })
	}
}

pub struct CatalogSession {
	tx: Transaction<'static, Sqlite>,
}

impl CatalogSession {
	pub fn conn(&mut self) -> &mut SqliteConnection {
		&mut *self.tx
	}

	pub async fn commit(self) -> Result<()> {
		self.tx.commit().await?;
		Ok(())
	}

	pub async fn rollback(self) -> Result<()> {
		tracing::debug!("rolling back catalog session");
		self.tx.rollback().await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_catalog_test_pool;

	async fn count_managers(pool: &SqlitePool) -> i64 {
		sqlx::query_scalar("SELECT COUNT(*) FROM resource_job_managers")
			.fetch_one(pool)
			.await
			.unwrap()
	}

	async fn insert_manager(session: &mut CatalogSession, id: &str) {
		sqlx::query(
			"INSERT INTO resource_job_managers (resource_job_manager_id, resource_job_manager_type, created_at) VALUES (?, 'PBS', ?)",
		)
		.bind(id)
		.bind(chrono::Utc::now())
		.execute(session.conn())
		.await
		.unwrap();
	}

	#[tokio::test]
	async fn test_commit_persists() {
		let provider = SessionProvider::new(create_catalog_test_pool().await);
		let mut session = provider.session().await.unwrap();
		insert_manager(&mut session, "pbs1").await;
		session.commit().await.unwrap();
		assert_eq!(count_managers(provider.pool()).await, 1);
	}

	#[tokio::test]
	async fn test_drop_rolls_back() {
		let provider = SessionProvider::new(create_catalog_test_pool().await);
		{
			let mut session = provider.session().await.unwrap();
			insert_manager(&mut session, "pbs1").await;
		}
		assert_eq!(count_managers(provider.pool()).await, 0);

		let mut session = provider.session().await.unwrap();
		insert_manager(&mut session, "pbs2").await;
		session.rollback().await.unwrap();
		assert_eq!(count_managers(provider.pool()).await, 0);
	}
}
