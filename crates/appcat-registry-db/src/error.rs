// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// The single error type surfaced by every catalog resource operation.
///
/// Storage failures keep their `sqlx` cause as the error source, but callers
/// should branch on the variant (or the message), never on the wrapped cause.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("Storage error: {0}")]
	Storage(#[from] sqlx::Error),

	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Unsupported: {0}")]
	Unsupported(String),

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
