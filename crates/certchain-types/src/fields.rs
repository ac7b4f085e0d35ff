//! Well-known record field names.
//!
//! Records are open mappings, so any key is accepted. These are the names
//! the issuing front ends use for certificate records.

pub const STUDENT: &str = "student";
pub const COURSE: &str = "course";
pub const INSTITUTION: &str = "institution";
pub const ISSUE_DATE: &str = "issue_date";
pub const CATEGORY: &str = "category";
pub const REMARKS: &str = "remarks";
