//! Typed rows of the two reports and the joined fee line

use crate::table::Cell;

/// Fee ratios and amounts of one confirmation row
///
/// Only the two summed amounts are read as numbers; empty ones are `None`.
/// The other columns are carried to the output exactly as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeBreakdown {
    pub total_ratio: Cell,
    pub total_amount: Cell,
    pub commission_ratio: Cell,
    pub commission_amount: Cell,
    /// Business development fee (展业费) ratio
    pub development_ratio: Cell,
    /// Business development fee (展业费) amount
    pub development_amount: Option<f64>,
    /// Performance bonus (绩效提奖) ratio
    pub bonus_ratio: Cell,
    /// Performance bonus (绩效提奖) amount
    pub bonus_amount: Option<f64>,
}

/// One row of the fee confirmation report
#[derive(Debug, Clone, PartialEq)]
pub struct FeeRecord {
    pub policy_no: String,
    pub endorsement_seq: String,
    pub installment: Cell,
    pub product_code: String,
    pub product_name: Cell,
    /// Owning branch; `None` when the cell is empty
    pub branch: Option<String>,
    pub channel: Cell,
    pub confirmed_at: Cell,
    pub accrued_at: Cell,
    pub underwritten_at: Cell,
    pub coverage_start: Cell,
    pub received_at: Cell,
    pub agent: Option<String>,
    pub fees: FeeBreakdown,
    pub premium: Cell,
    pub intervention_status: Cell,
}

/// One row of the policy roster report
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRecord {
    pub policy_no: String,
    pub endorsement_no: String,
    pub product_code: String,
    pub policyholder: Option<String>,
    pub insured_name: Option<String>,
    /// Insured amount as read; only parsed when a liability line uses it
    pub insured_amount: Cell,
}

/// A fee record joined with its policyholder and insured names
///
/// Fields follow [`crate::records::columns::JOINED_COLUMNS`]. The last one
/// carries the intervention status until the corrector replaces liability
/// rows with the roster insured amount.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeLine {
    pub policy_no: String,
    pub endorsement_seq: String,
    pub policyholder: Option<String>,
    pub insured_name: Option<String>,
    pub installment: Cell,
    pub product_code: String,
    pub product_name: Cell,
    pub branch: Option<String>,
    pub channel: Cell,
    pub confirmed_at: Cell,
    pub accrued_at: Cell,
    pub underwritten_at: Cell,
    pub coverage_start: Cell,
    pub received_at: Cell,
    pub agent: Option<String>,
    pub fees: FeeBreakdown,
    pub premium: Cell,
    pub liability_insured_amount: Cell,
}

fn text_cell(value: &Option<String>) -> Cell {
    value.clone().map(Cell::Text).unwrap_or_default()
}

fn number_cell(value: Option<f64>) -> Cell {
    value.map(Cell::Number).unwrap_or_default()
}

impl FeeLine {
    /// Build a line from a fee record and the identity found for its policy
    pub fn from_record(
        record: FeeRecord,
        policyholder: Option<String>,
        insured_name: Option<String>,
    ) -> Self {
        Self {
            policy_no: record.policy_no,
            endorsement_seq: record.endorsement_seq,
            policyholder,
            insured_name,
            installment: record.installment,
            product_code: record.product_code,
            product_name: record.product_name,
            branch: record.branch,
            channel: record.channel,
            confirmed_at: record.confirmed_at,
            accrued_at: record.accrued_at,
            underwritten_at: record.underwritten_at,
            coverage_start: record.coverage_start,
            received_at: record.received_at,
            agent: record.agent,
            fees: record.fees,
            premium: record.premium,
            liability_insured_amount: record.intervention_status,
        }
    }

    pub fn is_product(&self, product_code: &str) -> bool {
        self.product_code == product_code
    }

    pub fn in_branch(&self, branch: &str) -> bool {
        self.branch.as_deref() == Some(branch)
    }

    /// Cells in output column order
    pub fn cells(&self) -> Vec<Cell> {
        let fees = &self.fees;
        vec![
            Cell::Text(self.policy_no.clone()),
            Cell::Text(self.endorsement_seq.clone()),
            text_cell(&self.policyholder),
            text_cell(&self.insured_name),
            self.installment.clone(),
            Cell::Text(self.product_code.clone()),
            self.product_name.clone(),
            text_cell(&self.branch),
            self.channel.clone(),
            self.confirmed_at.clone(),
            self.accrued_at.clone(),
            self.underwritten_at.clone(),
            self.coverage_start.clone(),
            self.received_at.clone(),
            text_cell(&self.agent),
            fees.total_ratio.clone(),
            fees.total_amount.clone(),
            fees.commission_ratio.clone(),
            fees.commission_amount.clone(),
            fees.development_ratio.clone(),
            number_cell(fees.development_amount),
            fees.bonus_ratio.clone(),
            number_cell(fees.bonus_amount),
            self.premium.clone(),
            self.liability_insured_amount.clone(),
        ]
    }
}
