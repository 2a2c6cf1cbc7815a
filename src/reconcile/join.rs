//! Left join of fee records with roster identities

use log::debug;

use super::identity::IdentityLookup;
use crate::records::{FeeLine, FeeRecord};

/// Join every fee record with its policy's names
///
/// Records without a roster entry keep empty names; no record is dropped
/// and none is duplicated.
pub fn join_identities(records: Vec<FeeRecord>, lookup: &IdentityLookup) -> Vec<FeeLine> {
    let mut unmatched = 0usize;

    let lines: Vec<FeeLine> = records
        .into_iter()
        .map(|record| {
            let identity = lookup.get(&record.policy_no).cloned().unwrap_or_else(|| {
                unmatched += 1;
                Default::default()
            });
            FeeLine::from_record(record, identity.policyholder, identity.insured_name)
        })
        .collect();

    debug!(
        "Joined {} fee records with identities ({} without a roster entry)",
        lines.len(),
        unmatched
    );
    lines
}
