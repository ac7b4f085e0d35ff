use serde::{Deserialize, Serialize};

use certchain_types::fields;

use crate::error::LedgerError;

/// Configuration for a ledger instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Fields that must be present and non-blank before a record is collected.
    pub required_fields: Vec<String>,
    /// Field compared by name lookups.
    pub name_field: String,
    /// Field compared, together with the name, by name-and-course lookups.
    pub course_field: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            required_fields: vec![fields::STUDENT.into(), fields::COURSE.into()],
            name_field: fields::STUDENT.into(),
            course_field: fields::COURSE.into(),
        }
    }
}

impl LedgerConfig {
    /// Parse a TOML document. Missing keys fall back to the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make search impossible.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name_field.trim().is_empty() {
            return Err(LedgerError::Config("name_field must not be empty".into()));
        }
        if self.course_field.trim().is_empty() {
            return Err(LedgerError::Config("course_field must not be empty".into()));
        }
        if let Some(blank) = self.required_fields.iter().find(|f| f.trim().is_empty()) {
            return Err(LedgerError::Config(format!(
                "required field name {blank:?} is blank"
            )));
        }
        Ok(())
    }
}
