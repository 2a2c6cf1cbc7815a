//! Fee Reconcile - Fee confirmation vs. policy roster reconciliation
//!
//! This library provides:
//! - Loading of xlsx/xls/csv report exports with identifier columns kept as text
//! - Identity join of fee lines with policyholder and insured names
//! - Insured-amount correction for the liability-only product
//! - Development fee and performance bonus pivot per branch and agent
//! - Xlsx export and a per-branch zip archive

pub mod config;
pub mod error;
pub mod table;
pub mod records;
pub mod reconcile;
pub mod export;
pub mod pipeline;

// Re-export commonly used types
pub use config::ReconcileConfig;
pub use error::{ReconcileError, ReconcileResult};
pub use table::{Cell, Table, Upload};
pub use records::{FeeLine, FeeRecord, PolicyRecord};
pub use reconcile::{PivotSummary, ReconcileWarning};
pub use pipeline::{reconcile, run, Reconciliation, RunOutput};
