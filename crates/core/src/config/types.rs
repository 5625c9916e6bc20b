use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ticket::Column;

/// Root configuration
///
/// Keys match the `config.json` format (French key names).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Location of the ticket spreadsheet
    #[serde(default = "default_excel_path")]
    pub excel_path: PathBuf,
    /// Allowed program values, in display order
    #[serde(default)]
    pub programmes: Vec<String>,
    /// Allowed status values, in display order
    #[serde(default)]
    pub statuts: Vec<String>,
    /// Allowed priority values, in display order
    #[serde(default)]
    pub priorites: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excel_path: default_excel_path(),
            programmes: Vec::new(),
            statuts: Vec::new(),
            priorites: Vec::new(),
        }
    }
}

fn default_excel_path() -> PathBuf {
    PathBuf::from("suivi_jira_dcgf.xlsx")
}

impl Config {
    /// Configured choices for a column, for the columns that have them.
    pub fn choices(&self, column: Column) -> Option<&[String]> {
        match column {
            Column::Program => Some(self.programmes.as_slice()),
            Column::Status => Some(self.statuts.as_slice()),
            Column::Priority => Some(self.priorites.as_slice()),
            Column::Number | Column::Name | Column::Description => None,
        }
    }
}
