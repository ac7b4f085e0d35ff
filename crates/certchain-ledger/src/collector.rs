use certchain_types::Record;

use crate::error::LedgerError;

/// Holding area for validated records that have not been sealed yet.
#[derive(Clone, Debug, Default)]
pub struct Collector {
    required_fields: Vec<String>,
    pending: Vec<Record>,
}

impl Collector {
    pub fn new(required_fields: Vec<String>) -> Self {
        Self {
            required_fields,
            pending: Vec::new(),
        }
    }

    /// Check that every mandatory field is present and non-blank.
    pub fn validate(&self, record: &Record) -> Result<(), LedgerError> {
        let missing: Vec<String> = self
            .required_fields
            .iter()
            .filter(|field| record.is_blank(field))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Validation { missing })
        }
    }

    /// Validate and enqueue a record, returning it unchanged.
    pub fn push(&mut self, record: Record) -> Result<Record, LedgerError> {
        self.validate(&record)?;
        self.pending.push(record.clone());
        Ok(record)
    }

    pub fn records(&self) -> &[Record] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending record in insertion order, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.pending)
    }
}
