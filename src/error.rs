//! Error taxonomy for a reconciliation run
//!
//! Every variant here is fatal: the run aborts and nothing is exported.
//! Non-fatal findings are [`crate::reconcile::ReconcileWarning`]s instead.

use thiserror::Error;

use crate::reconcile::JoinKey;

/// The uploaded file could not be turned into a table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type for '{file}': expected .xlsx, .xls or .csv")]
    UnsupportedFormat { file: String },

    #[error("cannot read '{file}': {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open workbook '{file}': {source}")]
    Workbook {
        file: String,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot parse csv '{file}': {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("workbook '{file}' contains no worksheets")]
    NoSheets { file: String },

    #[error("first worksheet of '{file}' has no header row")]
    EmptySheet { file: String },
}

/// A loaded table does not have the shape the pipeline needs
///
/// Row numbers count data rows from 1; the header row is not counted.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("table '{table}', column '{column}', row {row}: '{value}' is not a number")]
    NotNumeric {
        table: String,
        column: String,
        row: usize,
        value: String,
    },
}

/// A fee line matched roster rows that disagree on the insured amount
#[derive(Debug, Error, PartialEq)]
#[error(
    "roster has conflicting insured amounts for policy '{}', endorsement '{}', product '{}'",
    .key.policy_no,
    .key.endorsement_seq,
    .key.product_code
)]
pub struct JoinCardinalityError {
    pub key: JoinKey,
}

/// Writing a workbook or the branch archive failed
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("xlsx writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("zip writer error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The run configuration file could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any fatal failure of a reconciliation run
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    JoinCardinality(#[from] JoinCardinalityError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
