use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use certchain_ledger::{LedgerConfig, QueryMode};

use crate::cli::OutputFormat;

/// Session settings read from a TOML file.
///
/// ```toml
/// format = "json"
/// query_mode = "name-and-course"
/// immediate = false
///
/// [ledger]
/// required_fields = ["student", "course", "institution"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub format: OutputFormat,
    pub query_mode: QueryMode,
    pub immediate: bool,
    pub ledger: LedgerConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.ledger.validate()?;
        Ok(config)
    }
}
