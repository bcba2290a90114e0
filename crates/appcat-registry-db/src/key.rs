// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Primary keys for catalog resources.
//!
//! A [`CatalogKey`] is an ordered list of key components. Simple-key
//! entities accept a single bare scalar (`CatalogKey::from("pbs1")`);
//! composite-key entities need every component named
//! (`CatalogKey::new().with("deployment_id", "d1").with("name", "PATH")`).
//! The shape is checked against the entity's key fields before any storage
//! access.

use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};
use crate::value::FieldValue;

/// One component of a key. `field` is `None` for a bare scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPart {
	pub field: Option<String>,
	pub value: FieldValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogKey {
	parts: Vec<KeyPart>,
}

impl CatalogKey {
	pub fn new() -> Self {
		Self::default()
	}

	/// A bare scalar key for a simple-key entity.
	pub fn scalar(value: impl Into<FieldValue>) -> Self {
		Self {
			parts: vec![KeyPart {
				field: None,
				value: value.into(),
			}],
		}
	}

	/// Append a named component.
	pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		self.parts.push(KeyPart {
			field: Some(field.into()),
			value: value.into(),
		});
		self
	}

	pub fn parts(&self) -> &[KeyPart] {
		&self.parts
	}

	pub fn is_scalar(&self) -> bool {
		matches!(self.parts.as_slice(), [KeyPart { field: None, .. }])
	}

	/// Match this key against an entity's ordered key fields.
	///
	/// Returns one `(field, value)` pair per key field, in key-field order.
	pub fn resolve(&self, key_fields: &[&'static str]) -> Result<Vec<(&'static str, FieldValue)>> {
		if self.parts.is_empty() {
			return Err(CatalogError::InvalidArgument(
				"identifier must not be empty".to_string(),
			));
		}

		if self.is_scalar() {
			let [field] = key_fields else {
				return Err(CatalogError::InvalidArgument(format!(
					"identifier must name each key field ({})",
					key_fields.join(", ")
				)));
			};
			let value = self.parts[0].value.clone();
			if value.is_null() {
				return Err(CatalogError::InvalidArgument(format!(
					"key field '{field}' must not be null"
				)));
			}
			return Ok(vec![(*field, value)]);
		}

		let mut resolved: Vec<Option<FieldValue>> = vec![None; key_fields.len()];
		for part in &self.parts {
			let Some(name) = part.field.as_deref() else {
				return Err(CatalogError::InvalidArgument(
					"composite identifier components must be named".to_string(),
				));
			};
			let Some(position) = key_fields.iter().position(|f| *f == name) else {
				return Err(CatalogError::InvalidArgument(format!(
					"'{name}' is not a key field ({})",
					key_fields.join(", ")
				)));
			};
			if resolved[position].is_some() {
				return Err(CatalogError::InvalidArgument(format!(
					"key field '{name}' given more than once"
				)));
			}
			if part.value.is_null() {
				return Err(CatalogError::InvalidArgument(format!(
					"key field '{name}' must not be null"
				)));
			}
			resolved[position] = Some(part.value.clone());
		}

		key_fields
			.iter()
			.zip(resolved)
			.map(|(field, value)| {
				value.map(|v| (*field, v)).ok_or_else(|| {
					CatalogError::InvalidArgument(format!("missing key field '{field}'"))
				})
			})
			.collect()
	}
}

impl From<&str> for CatalogKey {
	fn from(value: &str) -> Self {
		CatalogKey::scalar(value)
	}
}

impl From<String> for CatalogKey {
	fn from(value: String) -> Self {
		CatalogKey::scalar(value)
	}
}

/// Values are percent-encoded, so `=`, `,` and whitespace inside a value
/// survive a round trip through [`FromStr`].
impl fmt::Display for CatalogKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, part) in self.parts.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			let value = urlencoding::encode(&part.value.to_string()).into_owned();
			match &part.field {
				Some(field) => write!(f, "{}={value}", urlencoding::encode(field))?,
				None => f.write_str(&value)?,
			}
		}
		Ok(())
	}
}

fn decode(text: &str) -> Result<String> {
	urlencoding::decode(text.trim())
		.map(|decoded| decoded.into_owned())
		.map_err(|e| CatalogError::InvalidArgument(format!("invalid key text '{text}': {e}")))
}

/// Parses the `Display` form: either a bare value (`pbs1`) or
/// comma-separated `field=value` pairs (`deployment_id=d1,name=PATH`).
/// Components are percent-decoded and all values parse as text.
impl FromStr for CatalogKey {
	type Err = CatalogError;

	fn from_str(s: &str) -> Result<Self> {
		let s = s.trim();
		if s.is_empty() {
			return Err(CatalogError::InvalidArgument(
				"identifier must not be empty".to_string(),
			));
		}
		if !s.contains('=') {
			return Ok(CatalogKey::scalar(decode(s)?));
		}

		s.split(',').try_fold(CatalogKey::new(), |key, pair| {
			let (field, value) = pair.split_once('=').ok_or_else(|| {
				CatalogError::InvalidArgument(format!("expected field=value, got '{pair}'"))
			})?;
			let field = decode(field)?;
			if field.is_empty() {
				return Err(CatalogError::InvalidArgument(format!(
					"missing field name in '{pair}'"
				)));
			}
			Ok(key.with(field, decode(value)?))
		})
	}
}
