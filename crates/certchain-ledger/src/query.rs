use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use certchain_types::Record;

use crate::block::Block;
use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// Which designated field(s) a lookup compares against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMode {
    /// The configured name field.
    #[default]
    Name,
    /// The name field and the course field together.
    NameAndCourse,
    /// The record identifier.
    RecordId,
}

impl FromStr for QueryMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "name-course" | "name-and-course" => Ok(Self::NameAndCourse),
            "id" | "record-id" => Ok(Self::RecordId),
            other => Err(LedgerError::Config(format!("unknown query mode {other:?}"))),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::NameAndCourse => "name-course",
            Self::RecordId => "id",
        })
    }
}

/// A lookup against sealed records.
///
/// All comparisons are case-insensitive equality. Terms are trimmed when
/// the query is built; a query with an empty term matches nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    Name(String),
    NameAndCourse { name: String, course: String },
    RecordId(String),
}

impl Query {
    pub fn name(name: &str) -> Self {
        Self::Name(name.trim().to_string())
    }

    pub fn name_and_course(name: &str, course: &str) -> Self {
        Self::NameAndCourse {
            name: name.trim().to_string(),
            course: course.trim().to_string(),
        }
    }

    pub fn record_id(id: &str) -> Self {
        Self::RecordId(id.trim().to_string())
    }

    /// Build a query for `mode`. Name-and-course lookups need a course;
    /// its absence is reported under the configured course field name.
    pub fn for_mode(
        mode: QueryMode,
        term: &str,
        course: Option<&str>,
        config: &LedgerConfig,
    ) -> Result<Self, LedgerError> {
        match mode {
            QueryMode::Name => Ok(Self::name(term)),
            QueryMode::NameAndCourse => {
                let course = course.ok_or_else(|| LedgerError::Validation {
                    missing: vec![config.course_field.clone()],
                })?;
                Ok(Self::name_and_course(term, course))
            }
            QueryMode::RecordId => Ok(Self::record_id(term)),
        }
    }

    pub fn mode(&self) -> QueryMode {
        match self {
            Self::Name(_) => QueryMode::Name,
            Self::NameAndCourse { .. } => QueryMode::NameAndCourse,
            Self::RecordId(_) => QueryMode::RecordId,
        }
    }

    /// Returns `true` if `record` satisfies this query under `config`.
    pub fn matches(&self, record: &Record, config: &LedgerConfig) -> bool {
        match self {
            Self::Name(name) => !name.is_empty() && record.field_matches(&config.name_field, name),
            Self::NameAndCourse { name, course } => {
                !name.is_empty()
                    && !course.is_empty()
                    && record.field_matches(&config.name_field, name)
                    && record.field_matches(&config.course_field, course)
            }
            Self::RecordId(id) => {
                !id.is_empty() && record.id.as_ref().is_some_and(|rid| rid.matches(id))
            }
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name={name:?}"),
            Self::NameAndCourse { name, course } => write!(f, "name={name:?} course={course:?}"),
            Self::RecordId(id) => write!(f, "id={id:?}"),
        }
    }
}

/// A matching record together with the block that holds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub record: Record,
    pub block: Block,
}

impl SearchHit {
    pub fn block_index(&self) -> u64 {
        self.block.index()
    }
}
