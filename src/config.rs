//! Run configuration
//!
//! Defaults reproduce the constants the back office has always used. A JSON
//! file may override any subset of fields.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings for one reconciliation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReconcileConfig {
    /// Product code whose insured amount is taken from the roster
    #[serde(default = "default_liability_product_code")]
    pub liability_product_code: String,

    /// Endorsement sequence of the base policy, used as the zero-amount fallback
    #[serde(default = "default_base_endorsement")]
    pub base_endorsement: String,

    /// Directory prefix of the per-branch entries inside the archive
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// Sheet holding the corrected rows of a branch workbook
    #[serde(default = "default_detail_sheet_name")]
    pub detail_sheet_name: String,

    /// Sheet holding the pivot rows of a branch workbook
    #[serde(default = "default_pivot_sheet_name")]
    pub pivot_sheet_name: String,

    #[serde(default = "default_corrected_file_name")]
    pub corrected_file_name: String,

    #[serde(default = "default_pivot_file_name")]
    pub pivot_file_name: String,

    #[serde(default = "default_archive_file_name")]
    pub archive_file_name: String,
}

fn default_liability_product_code() -> String { "0460".to_string() }
fn default_base_endorsement() -> String { "000".to_string() }
fn default_archive_dir() -> String { "part".to_string() }
fn default_detail_sheet_name() -> String { "Sheet1".to_string() }
fn default_pivot_sheet_name() -> String { "Sheet2".to_string() }
fn default_corrected_file_name() -> String { "费用查询确认.xlsx".to_string() }
fn default_pivot_file_name() -> String { "数据透视表.xlsx".to_string() }
fn default_archive_file_name() -> String { "ExcelFiles.zip".to_string() }

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            liability_product_code: default_liability_product_code(),
            base_endorsement: default_base_endorsement(),
            archive_dir: default_archive_dir(),
            detail_sheet_name: default_detail_sheet_name(),
            pivot_sheet_name: default_pivot_sheet_name(),
            corrected_file_name: default_corrected_file_name(),
            pivot_file_name: default_pivot_file_name(),
            archive_file_name: default_archive_file_name(),
        }
    }
}

impl ReconcileConfig {
    /// Parse a config from JSON text; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Archive entry path for a branch workbook
    pub fn archive_entry_name(&self, branch: &str) -> String {
        format!("{}/{}.xlsx", self.archive_dir, branch)
    }
}
