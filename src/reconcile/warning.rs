//! Non-fatal findings of a run

use std::fmt;

use serde::Serialize;

/// A problem worth showing to the user that does not abort the run
///
/// `row` is the 1-based position of the line in the corrected table, which
/// follows the order of the confirmation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconcileWarning {
    /// A liability fee line has no roster row for its policy, endorsement and product
    UnmatchedPolicy {
        row: usize,
        policy_no: String,
        endorsement_seq: String,
    },
    /// A zero liability amount could not be replaced from the base endorsement
    MissingBaseEndorsement { row: usize, policy_no: String },
}

impl ReconcileWarning {
    pub fn policy_no(&self) -> &str {
        match self {
            ReconcileWarning::UnmatchedPolicy { policy_no, .. }
            | ReconcileWarning::MissingBaseEndorsement { policy_no, .. } => policy_no,
        }
    }
}

impl fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileWarning::UnmatchedPolicy {
                row,
                policy_no,
                endorsement_seq,
            } => write!(
                f,
                "row {}: policy {} (endorsement {}) not found in the premium roster",
                row, policy_no, endorsement_seq
            ),
            ReconcileWarning::MissingBaseEndorsement { row, policy_no } => write!(
                f,
                "row {}: policy {} has a zero insured amount and no base endorsement to fall back on",
                row, policy_no
            ),
        }
    }
}

/// Policy numbers of unmatched liability lines, in row order
pub fn unmatched_policies(warnings: &[ReconcileWarning]) -> Vec<&str> {
    warnings
        .iter()
        .filter(|w| matches!(w, ReconcileWarning::UnmatchedPolicy { .. }))
        .map(ReconcileWarning::policy_no)
        .collect()
}
