//! Insured-amount correction for the liability-only product
//!
//! The intervention status column of a liability fee line is replaced with
//! the roster's insured amount for the same policy, endorsement and product.
//! A zero amount falls back to the base endorsement of the policy.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, warn};

use super::warning::ReconcileWarning;
use crate::config::ReconcileConfig;
use crate::error::JoinCardinalityError;
use crate::records::{FeeLine, PolicyRecord};
use crate::table::Cell;

/// Join key between fee lines and roster rows
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey {
    pub policy_no: String,
    pub endorsement_seq: String,
    pub product_code: String,
}

impl JoinKey {
    pub fn new(
        policy_no: impl Into<String>,
        endorsement_seq: impl Into<String>,
        product_code: impl Into<String>,
    ) -> Self {
        Self {
            policy_no: policy_no.into(),
            endorsement_seq: endorsement_seq.into(),
            product_code: product_code.into(),
        }
    }

    pub fn of_line(line: &FeeLine) -> Self {
        Self::new(
            line.policy_no.as_str(),
            line.endorsement_seq.as_str(),
            line.product_code.as_str(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
enum LookupEntry {
    Unique(Cell),
    /// Several roster rows share the key but disagree on the amount
    Conflicting,
}

/// Outcome of looking a key up in the roster
#[derive(Debug, Clone, PartialEq)]
pub enum AmountMatch {
    Unmatched,
    /// A roster row exists; its amount may be empty or non-numeric
    Matched(Cell),
}

/// Roster insured amounts deduplicated by (policy, endorsement, product)
///
/// Amounts are compared after numeric text is read as a number. A key whose
/// rows disagree is only an error once a fee line looks it up.
#[derive(Debug, Clone, Default)]
pub struct InsuredAmountLookup {
    entries: HashMap<JoinKey, LookupEntry>,
}

impl InsuredAmountLookup {
    /// Build the lookup; repeated rows with the same amount collapse to one
    pub fn from_roster(records: &[PolicyRecord]) -> Self {
        let mut entries: HashMap<JoinKey, LookupEntry> = HashMap::with_capacity(records.len());

        for record in records {
            let key = JoinKey::new(
                record.policy_no.as_str(),
                record.endorsement_no.as_str(),
                record.product_code.as_str(),
            );
            let amount = record.insured_amount.clone().into_numeric();
            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(LookupEntry::Unique(amount));
                }
                Entry::Occupied(mut slot) => {
                    if *slot.get() != LookupEntry::Unique(amount) {
                        slot.insert(LookupEntry::Conflicting);
                    }
                }
            }
        }

        Self { entries }
    }

    /// Look a key up, failing if it would match more than one distinct row
    pub fn find(&self, key: &JoinKey) -> Result<AmountMatch, JoinCardinalityError> {
        match self.entries.get(key) {
            None => Ok(AmountMatch::Unmatched),
            Some(LookupEntry::Unique(amount)) => Ok(AmountMatch::Matched(amount.clone())),
            Some(LookupEntry::Conflicting) => Err(JoinCardinalityError { key: key.clone() }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Corrected lines plus the warnings raised while correcting them
#[derive(Debug, Clone)]
pub struct Correction {
    pub lines: Vec<FeeLine>,
    pub warnings: Vec<ReconcileWarning>,
}

/// Replace the liability insured amount of every liability fee line
///
/// Lines of other products keep their intervention status untouched. A
/// liability line without a roster row ends up empty and is reported; a
/// non-numeric roster amount is copied as read. A zero amount takes the base endorsement's amount; if there is none the
/// zero stays and is reported.
pub fn correct_insured_amounts(
    mut lines: Vec<FeeLine>,
    roster: &[PolicyRecord],
    config: &ReconcileConfig,
) -> Result<Correction, JoinCardinalityError> {
    let lookup = InsuredAmountLookup::from_roster(roster);
    let liability_code = config.liability_product_code.as_str();

    let matches = lines
        .iter()
        .map(|line| lookup.find(&JoinKey::of_line(line)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut warnings = Vec::new();
    let mut corrected = 0usize;
    let mut backfilled = 0usize;

    for (idx, (line, found)) in lines.iter_mut().zip(matches).enumerate() {
        if !line.is_product(liability_code) {
            continue;
        }
        let row = idx + 1;

        line.liability_insured_amount = match found {
            AmountMatch::Matched(amount) => {
                if !amount.is_empty() && amount.parse_number().is_none() {
                    warn!(
                        "Policy {} (endorsement {}) has a non-numeric insured amount '{}'",
                        line.policy_no, line.endorsement_seq, amount
                    );
                }
                amount
            }
            AmountMatch::Unmatched => {
                warn!(
                    "Policy {} (endorsement {}) not found in roster",
                    line.policy_no, line.endorsement_seq
                );
                warnings.push(ReconcileWarning::UnmatchedPolicy {
                    row,
                    policy_no: line.policy_no.clone(),
                    endorsement_seq: line.endorsement_seq.clone(),
                });
                Cell::Empty
            }
        };
        corrected += 1;

        if !line.liability_insured_amount.is_zero() {
            continue;
        }

        let base_key = JoinKey::new(
            line.policy_no.as_str(),
            config.base_endorsement.as_str(),
            line.product_code.as_str(),
        );
        match lookup.find(&base_key)? {
            AmountMatch::Matched(Cell::Number(base_amount)) => {
                line.liability_insured_amount = Cell::Number(base_amount);
                backfilled += 1;
            }
            _ => {
                warn!(
                    "Policy {} has a zero insured amount and no base endorsement {}",
                    line.policy_no, config.base_endorsement
                );
                warnings.push(ReconcileWarning::MissingBaseEndorsement {
                    row,
                    policy_no: line.policy_no.clone(),
                });
            }
        }
    }

    debug!(
        "Corrected {} liability lines ({} from base endorsement), {} roster keys",
        corrected,
        backfilled,
        lookup.len()
    );

    Ok(Correction { lines, warnings })
}
