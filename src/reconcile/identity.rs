//! Policyholder and insured names per policy number

use std::collections::HashMap;

use crate::records::PolicyRecord;

/// Names recorded on the roster for one policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub policyholder: Option<String>,
    pub insured_name: Option<String>,
}

/// Policy number → identity, one entry per policy number
#[derive(Debug, Clone, Default)]
pub struct IdentityLookup {
    entries: HashMap<String, Identity>,
}

impl IdentityLookup {
    /// Build the lookup from roster rows; the first row of a policy wins
    pub fn from_roster(records: &[PolicyRecord]) -> Self {
        let mut entries = HashMap::new();
        for record in records {
            entries
                .entry(record.policy_no.clone())
                .or_insert_with(|| Identity {
                    policyholder: record.policyholder.clone(),
                    insured_name: record.insured_name.clone(),
                });
        }
        Self { entries }
    }

    pub fn get(&self, policy_no: &str) -> Option<&Identity> {
        self.entries.get(policy_no)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
