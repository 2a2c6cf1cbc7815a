//! Join, correction and aggregation stages of a reconciliation run
//!
//! Each stage is a pure function of its inputs:
//! 1. [`IdentityLookup::from_roster`] picks one set of names per policy
//! 2. [`join_identities`] left-joins fee records with those names
//! 3. [`correct_insured_amounts`] fills the liability insured amount
//! 4. [`PivotSummary::from_lines`] sums fees per branch and agent

mod identity;
mod join;
mod correct;
mod pivot;
mod warning;

pub use identity::{Identity, IdentityLookup};
pub use join::join_identities;
pub use correct::{correct_insured_amounts, AmountMatch, Correction, InsuredAmountLookup, JoinKey};
pub use pivot::{PivotKey, PivotSummary, PivotTotals};
pub use warning::{unmatched_policies, ReconcileWarning};
