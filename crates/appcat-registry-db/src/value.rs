// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scalar values bound into generated catalog queries.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{QueryBuilder, Sqlite};
use std::fmt;

/// A single column value, either a key component, a filter value or an
/// attribute copied on save.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	Null,
	Bool(bool),
	Integer(i64),
	Text(String),
	Timestamp(DateTime<Utc>),
}

impl FieldValue {
	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Null)
	}

	pub(crate) fn push_bind(self, builder: &mut QueryBuilder<'static, Sqlite>) {
		match self {
			FieldValue::Null => builder.push_bind(Option::<String>::None),
			FieldValue::Bool(v) => builder.push_bind(v),
			FieldValue::Integer(v) => builder.push_bind(v),
			FieldValue::Text(v) => builder.push_bind(v),
			FieldValue::Timestamp(v) => builder.push_bind(v),
		};
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Null => f.write_str("null"),
			FieldValue::Bool(v) => write!(f, "{v}"),
			FieldValue::Integer(v) => write!(f, "{v}"),
			FieldValue::Text(v) => f.write_str(v),
			FieldValue::Timestamp(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::Millis, true)),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		FieldValue::Text(value.to_string())
	}
}

impl From<&String> for FieldValue {
	fn from(value: &String) -> Self {
		FieldValue::Text(value.clone())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		FieldValue::Text(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		FieldValue::Integer(value)
	}
}

impl From<i32> for FieldValue {
	fn from(value: i32) -> Self {
		FieldValue::Integer(value.into())
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		FieldValue::Bool(value)
	}
}

impl From<DateTime<Utc>> for FieldValue {
	fn from(value: DateTime<Utc>) -> Self {
		FieldValue::Timestamp(value)
	}
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(FieldValue::Null, Into::into)
	}
}
