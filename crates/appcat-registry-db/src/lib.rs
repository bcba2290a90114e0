// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # appcat-registry-db
//!
//! Application catalog persistence over SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! Every catalog entity shares one contract and one implementation:
//! - **[`CatalogStore<E>`] trait**: the resource operations (`get`,
//!   `get_by_field`, `get_all`, `get_all_ids`, `get_all_keys`, `get_ids`,
//!   `save`, `remove`, `is_exists`)
//! - **[`CatalogRepository<E>`] struct**: the generic implementation, driven
//!   by the entity's [`EntityDescriptor`]
//!
//! ```rust,ignore
//! let managers = CatalogRepository::<ResourceJobManager>::new(pool.clone());
//! managers.save(&manager).await?;
//! let manager = managers.get(&"pbs1".into()).await?;
//!
//! let envs = CatalogRepository::<AppEnvironment>::new(pool);
//! let key = CatalogKey::new().with("deployment_id", "d1").with("name", "PATH");
//! envs.remove(&key).await?;
//! ```
//!
//! [`CatalogRegistry`] dispatches the same operations by [`ResourceType`]
//! tag for callers that only know the entity type at runtime.
//!
//! ## Error Handling
//!
//! | Variant | When |
//! |---------|------|
//! | `InvalidArgument` | Wrong key shape, unknown or unsupported field name |
//! | `NotFound` | `get` found nothing, or a parent referenced on `save` is missing |
//! | `Unsupported` | Id listing on an entity without a natural identifier |
//! | `Storage` | Any sqlx failure, propagated via `?` |
//! | `Internal` | Stored data that cannot be decoded |
//!
//! ## Return Type Conventions
//!
//! | Operation | Return type |
//! |-----------|-------------|
//! | Get by key | `Result<E>` |
//! | List/search | `Result<Vec<E>>` |
//! | Save | `Result<()>` |
//! | Remove | `Result<bool>` (true if deleted) |
//! | Exists | `Result<bool>` |

pub mod entities;
pub mod error;
pub mod factory;
pub mod key;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod registry;
pub mod repository;
pub mod schema;
pub mod session;
pub mod types;
pub mod value;

#[cfg(test)]
pub mod testing;

pub use entities::*;
pub use error::{CatalogError, Result};
pub use factory::{AnyResource, ResourceType};
pub use key::{CatalogKey, KeyPart};
pub use migrations::run_migrations;
pub use pool::create_pool;
pub use query::QueryGenerator;
pub use registry::CatalogRegistry;
pub use repository::{CatalogRepository, CatalogStore};
pub use schema::{CatalogEntity, EntityDescriptor, ParentRef};
pub use session::{CatalogSession, SessionProvider};
pub use types::{
	DataMovementProtocol, JobManagerCommandType, JobSubmissionProtocol, MonitorMode,
	ResourceJobManagerType, SecurityProtocol,
};
pub use value::FieldValue;
