use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::fields;

/// Identifier attached to a record.
///
/// Issuers may supply their own identifier (for example a certificate
/// number) or let certchain generate a time-ordered UUID v7.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a caller-supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new time-ordered identifier (UUID v7).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a query string. Surrounding
    /// whitespace on either side is ignored, as for field values.
    pub fn matches(&self, query: &str) -> bool {
        self.0.trim().to_lowercase() == query.trim().to_lowercase()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single issued record, such as a student certificate.
///
/// Fields are an open mapping of string keys to string values. The map is
/// ordered by key, so two records built from the same fields in a
/// different insertion order serialize to identical bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the two-field certificate shape (`student`, `course`).
    pub fn certificate(student: impl Into<String>, course: impl Into<String>) -> Self {
        Self::new()
            .with_field(fields::STUDENT, student)
            .with_field(fields::COURSE, course)
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Apply a `key=value` assignment as typed by a user.
    pub fn insert_assignment(&mut self, assignment: &str) -> Result<(), TypeError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| TypeError::InvalidField(assignment.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(TypeError::InvalidField(assignment.to_string()));
        }
        self.fields.insert(key.to_string(), value.trim().to_string());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// A field is blank when it is absent or contains only whitespace.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).map_or(true, |v| v.trim().is_empty())
    }

    /// Case-insensitive equality between a field and a query string.
    pub fn field_matches(&self, key: &str, query: &str) -> bool {
        self.get(key)
            .is_some_and(|v| v.trim().to_lowercase() == query.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
