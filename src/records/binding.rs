//! Bind loaded tables to typed records by header name

use std::collections::HashMap;

use super::columns::*;
use super::data::{FeeBreakdown, FeeRecord, PolicyRecord};
use crate::error::SchemaError;
use crate::table::{Cell, Table};

/// Header positions of the required columns of one table
struct ColumnMap<'a> {
    table: &'a Table,
    positions: HashMap<&'static str, usize>,
}

impl<'a> ColumnMap<'a> {
    fn require(table: &'a Table, columns: &[&'static str]) -> Result<Self, SchemaError> {
        let mut positions = HashMap::with_capacity(columns.len());
        for &column in columns {
            let idx = table
                .column_index(column)
                .ok_or_else(|| SchemaError::MissingColumn {
                    table: table.name.clone(),
                    column: column.to_string(),
                })?;
            positions.insert(column, idx);
        }
        Ok(Self { table, positions })
    }

    fn cell<'r>(&self, row: &'r [Cell], column: &'static str) -> &'r Cell {
        // Only required columns are ever looked up
        &row[self.positions[column]]
    }

    fn text(&self, row: &[Cell], column: &'static str) -> String {
        self.cell(row, column).to_text().unwrap_or_default()
    }

    fn optional_text(&self, row: &[Cell], column: &'static str) -> Option<String> {
        self.cell(row, column).to_text()
    }

    fn cloned(&self, row: &[Cell], column: &'static str) -> Cell {
        self.cell(row, column).clone()
    }

    /// Parse a summed amount column; `row_no` is the 1-based data row for errors
    fn number(
        &self,
        row: &[Cell],
        row_no: usize,
        column: &'static str,
    ) -> Result<Option<f64>, SchemaError> {
        let cell = self.cell(row, column);
        if cell.is_blank() {
            return Ok(None);
        }
        cell.parse_number()
            .map(Some)
            .ok_or_else(|| SchemaError::NotNumeric {
                table: self.table.name.clone(),
                column: column.to_string(),
                row: row_no,
                value: cell.to_string(),
            })
    }
}

/// Bind every row of the fee confirmation table
pub fn bind_fee_records(table: &Table) -> Result<Vec<FeeRecord>, SchemaError> {
    let map = ColumnMap::require(table, &FEE_REQUIRED_COLUMNS)?;

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| -> Result<FeeRecord, SchemaError> {
            let row_no = idx + 1;
            Ok(FeeRecord {
                policy_no: map.text(row, POLICY_NO),
                endorsement_seq: map.text(row, ENDORSEMENT_SEQ),
                installment: map.cloned(row, INSTALLMENT),
                product_code: map.text(row, PRODUCT_CODE),
                product_name: map.cloned(row, PRODUCT_NAME),
                branch: map.optional_text(row, BRANCH),
                channel: map.cloned(row, CHANNEL),
                confirmed_at: map.cloned(row, CONFIRMED_AT),
                accrued_at: map.cloned(row, ACCRUED_AT),
                underwritten_at: map.cloned(row, UNDERWRITTEN_AT),
                coverage_start: map.cloned(row, COVERAGE_START),
                received_at: map.cloned(row, RECEIVED_AT),
                agent: map.optional_text(row, AGENT),
                fees: FeeBreakdown {
                    total_ratio: map.cloned(row, TOTAL_FEE_RATIO),
                    total_amount: map.cloned(row, TOTAL_FEE_AMOUNT),
                    commission_ratio: map.cloned(row, COMMISSION_RATIO),
                    commission_amount: map.cloned(row, COMMISSION_AMOUNT),
                    development_ratio: map.cloned(row, DEVELOPMENT_FEE_RATIO),
                    development_amount: map.number(row, row_no, DEVELOPMENT_FEE_AMOUNT)?,
                    bonus_ratio: map.cloned(row, BONUS_RATIO),
                    bonus_amount: map.number(row, row_no, BONUS_AMOUNT)?,
                },
                premium: map.cloned(row, PREMIUM),
                intervention_status: map.cloned(row, INTERVENTION_STATUS),
            })
        })
        .collect()
}

/// Bind every row of the policy roster table
pub fn bind_policy_records(table: &Table) -> Result<Vec<PolicyRecord>, SchemaError> {
    let map = ColumnMap::require(table, &ROSTER_REQUIRED_COLUMNS)?;

    Ok(table
        .rows()
        .iter()
        .map(|row| PolicyRecord {
            policy_no: map.text(row, POLICY_NO),
            endorsement_no: map.text(row, ENDORSEMENT_NO),
            product_code: map.text(row, PRODUCT_CODE),
            policyholder: map.optional_text(row, POLICYHOLDER),
            insured_name: map.optional_text(row, INSURED_NAME),
            insured_amount: map.cloned(row, INSURED_AMOUNT),
        })
        .collect())
}
