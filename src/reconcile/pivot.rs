//! Fee sums per branch and agent

use std::collections::BTreeMap;

use crate::records::FeeLine;

/// Pivot index: owning branch and agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PivotKey {
    pub branch: String,
    pub agent: String,
}

/// Summed amounts of one group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PivotTotals {
    /// Sum of business development fee amounts (展业费金额)
    pub development_fee: f64,
    /// Sum of performance bonus amounts (绩效提奖金额)
    pub performance_bonus: f64,
}

impl PivotTotals {
    fn add(&mut self, other: PivotTotals) {
        self.development_fee += other.development_fee;
        self.performance_bonus += other.performance_bonus;
    }
}

/// (branch, agent) → summed fee amounts, ordered by key
///
/// Lines with an empty branch or agent belong to no group. Empty amounts
/// count as nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotSummary {
    groups: BTreeMap<PivotKey, PivotTotals>,
}

impl PivotSummary {
    pub fn from_lines(lines: &[FeeLine]) -> Self {
        let mut groups: BTreeMap<PivotKey, PivotTotals> = BTreeMap::new();

        for line in lines {
            let (Some(branch), Some(agent)) = (&line.branch, &line.agent) else {
                continue;
            };
            let key = PivotKey {
                branch: branch.clone(),
                agent: agent.clone(),
            };
            groups.entry(key).or_default().add(PivotTotals {
                development_fee: line.fees.development_amount.unwrap_or(0.0),
                performance_bonus: line.fees.bonus_amount.unwrap_or(0.0),
            });
        }

        Self { groups }
    }

    pub fn get(&self, branch: &str, agent: &str) -> Option<&PivotTotals> {
        self.groups.get(&PivotKey {
            branch: branch.to_string(),
            agent: agent.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PivotKey, &PivotTotals)> {
        self.groups.iter()
    }

    /// Distinct branches in key order
    pub fn branches(&self) -> Vec<&str> {
        let mut branches: Vec<&str> = self.groups.keys().map(|k| k.branch.as_str()).collect();
        branches.dedup();
        branches
    }

    /// Groups of one branch, in agent order
    pub fn branch_slice<'a>(
        &'a self,
        branch: &'a str,
    ) -> impl Iterator<Item = (&'a PivotKey, &'a PivotTotals)> + 'a {
        self.groups.iter().filter(move |(key, _)| key.branch == branch)
    }

    /// Sum over every group
    pub fn totals(&self) -> PivotTotals {
        let mut totals = PivotTotals::default();
        for group in self.groups.values() {
            totals.add(*group);
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
