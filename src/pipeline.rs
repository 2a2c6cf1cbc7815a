//! End-to-end reconciliation run
//!
//! Takes the two uploads in, hands byte buffers and warnings out. Nothing is
//! kept between runs, so callers are free to memoize [`run`] on the upload
//! contents.

use log::info;

use crate::config::ReconcileConfig;
use crate::error::{ExportError, LoadError, ReconcileResult};
use crate::export::{branch_archive, corrected_workbook, pivot_workbook};
use crate::records::columns::{FEE_TEXT_COLUMNS, ROSTER_TEXT_COLUMNS};
use crate::records::{bind_fee_records, bind_policy_records, FeeLine};
use crate::reconcile::{
    correct_insured_amounts, join_identities, Correction, IdentityLookup, PivotSummary,
    ReconcileWarning,
};
use crate::table::{load_table, Table, Upload};

/// Corrected lines, their pivot and the warnings of the run
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub lines: Vec<FeeLine>,
    pub pivot: PivotSummary,
    pub warnings: Vec<ReconcileWarning>,
}

/// Serialized outputs of a run
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Full corrected table, one sheet
    pub corrected_xlsx: Vec<u8>,
    /// Pivot summary, one sheet
    pub pivot_xlsx: Vec<u8>,
    /// One two-sheet workbook per branch
    pub archive_zip: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub reconciliation: Reconciliation,
    pub artifacts: Artifacts,
}

/// Load both uploads with their identifier columns kept as text
pub fn load_inputs(confirm: &Upload, roster: &Upload) -> Result<(Table, Table), LoadError> {
    let confirm = load_table(confirm, &FEE_TEXT_COLUMNS)?;
    let roster = load_table(roster, &ROSTER_TEXT_COLUMNS)?;
    Ok((confirm, roster))
}

/// Run the join, correction and aggregation stages on loaded tables
pub fn reconcile(
    confirm: &Table,
    roster: &Table,
    config: &ReconcileConfig,
) -> ReconcileResult<Reconciliation> {
    let fee_records = bind_fee_records(confirm)?;
    let policies = bind_policy_records(roster)?;
    let fee_count = fee_records.len();

    let identities = IdentityLookup::from_roster(&policies);
    let joined = join_identities(fee_records, &identities);
    let Correction { lines, warnings } = correct_insured_amounts(joined, &policies, config)?;
    debug_assert_eq!(lines.len(), fee_count);

    let pivot = PivotSummary::from_lines(&lines);

    info!(
        "Reconciled {} fee lines against {} roster rows: {} pivot groups, {} warnings",
        lines.len(),
        policies.len(),
        pivot.len(),
        warnings.len()
    );

    Ok(Reconciliation {
        lines,
        pivot,
        warnings,
    })
}

/// Serialize a reconciliation into the three output buffers
pub fn export(
    reconciliation: &Reconciliation,
    config: &ReconcileConfig,
) -> Result<Artifacts, ExportError> {
    Ok(Artifacts {
        corrected_xlsx: corrected_workbook(&reconciliation.lines)?,
        pivot_xlsx: pivot_workbook(&reconciliation.pivot)?,
        archive_zip: branch_archive(&reconciliation.lines, &reconciliation.pivot, config)?,
    })
}

/// Full run: load, reconcile and export
pub fn run(
    confirm: &Upload,
    roster: &Upload,
    config: &ReconcileConfig,
) -> ReconcileResult<RunOutput> {
    let (confirm, roster) = load_inputs(confirm, roster)?;
    let reconciliation = reconcile(&confirm, &roster, config)?;
    let artifacts = export(&reconciliation, config)?;

    Ok(RunOutput {
        reconciliation,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use crate::records::columns::*;
    use crate::reconcile::{unmatched_policies, JoinKey};
    use crate::table::Cell;
    use approx::assert_relative_eq;
    use rust_xlsxwriter::Workbook;
    use std::io::Cursor;
    use zip::ZipArchive;

    struct FeeRow {
        policy_no: &'static str,
        endorsement_seq: &'static str,
        product_code: &'static str,
        branch: &'static str,
        agent: &'static str,
        development_fee: f64,
        bonus: f64,
        status: &'static str,
    }

    fn confirm_upload(rows: &[FeeRow]) -> Upload {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let mut headers: Vec<&str> = FEE_REQUIRED_COLUMNS.to_vec();
        // Columns outside the projection are dropped
        headers.push("备注");
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }

        let col = |name: &str| headers.iter().position(|h| *h == name).unwrap() as u16;
        for (idx, fee) in rows.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, col(POLICY_NO), fee.policy_no).unwrap();
            sheet.write_string(row, col(ENDORSEMENT_SEQ), fee.endorsement_seq).unwrap();
            sheet.write_string(row, col(PRODUCT_CODE), fee.product_code).unwrap();
            sheet.write_string(row, col(BRANCH), fee.branch).unwrap();
            sheet.write_string(row, col(AGENT), fee.agent).unwrap();
            sheet.write_number(row, col(DEVELOPMENT_FEE_AMOUNT), fee.development_fee).unwrap();
            sheet.write_number(row, col(BONUS_AMOUNT), fee.bonus).unwrap();
            sheet.write_number(row, col(PREMIUM), 1000.0).unwrap();
            sheet.write_number(row, col(INTERVENTION_STATUS), 0.0).unwrap();
            if !fee.status.is_empty() {
                sheet.write_string(row, col(INTERVENTION_STATUS), fee.status).unwrap();
            }
            sheet.write_string(row, col("备注"), "ignored").unwrap();
        }
        Upload::new("费用查询表.xlsx", workbook.save_to_buffer().unwrap())
    }

    fn roster_upload(rows: &[(&str, &str, &str, &str, f64)]) -> Upload {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ROSTER_REQUIRED_COLUMNS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (idx, (policy_no, endorsement, product, holder, amount)) in rows.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, *policy_no).unwrap();
            sheet.write_string(row, 1, *endorsement).unwrap();
            sheet.write_string(row, 2, *product).unwrap();
            sheet.write_string(row, 3, *holder).unwrap();
            sheet.write_string(row, 4, *holder).unwrap();
            sheet.write_number(row, 5, *amount).unwrap();
        }
        Upload::new("保费清单表.xlsx", workbook.save_to_buffer().unwrap())
    }

    fn sample_confirm() -> Upload {
        confirm_upload(&[
            FeeRow {
                policy_no: "P001",
                endorsement_seq: "001",
                product_code: "0460",
                branch: "北京分公司",
                agent: "赵六",
                development_fee: 100.0,
                bonus: 10.0,
                status: "",
            },
            FeeRow {
                policy_no: "P002",
                endorsement_seq: "000",
                product_code: "0301",
                branch: "北京分公司",
                agent: "钱七",
                development_fee: 40.0,
                bonus: 4.0,
                status: "未干预",
            },
            FeeRow {
                policy_no: "P003",
                endorsement_seq: "000",
                product_code: "0460",
                branch: "上海分公司",
                agent: "孙八",
                development_fee: 60.0,
                bonus: 6.0,
                status: "",
            },
        ])
    }

    fn sample_roster() -> Upload {
        roster_upload(&[
            ("P001", "000", "0460", "张三", 50000.0),
            ("P001", "001", "0460", "张三", 0.0),
            ("P002", "000", "0301", "李四", 30000.0),
        ])
    }

    #[test]
    fn test_full_run() {
        let output = run(&sample_confirm(), &sample_roster(), &ReconcileConfig::default()).unwrap();
        let reconciliation = &output.reconciliation;

        assert_eq!(reconciliation.lines.len(), 3);
        // Zero on endorsement 001 falls back to the base endorsement
        assert_eq!(reconciliation.lines[0].liability_insured_amount, Cell::Number(50000.0));
        assert_eq!(reconciliation.lines[0].policyholder.as_deref(), Some("张三"));
        assert_eq!(reconciliation.lines[1].liability_insured_amount, Cell::Text("未干预".into()));
        // P003 is not on the roster at all
        assert_eq!(reconciliation.lines[2].liability_insured_amount, Cell::Empty);
        assert_eq!(reconciliation.lines[2].policyholder, None);
        assert_eq!(unmatched_policies(&reconciliation.warnings), vec!["P003"]);

        let totals = reconciliation.pivot.totals();
        assert_relative_eq!(totals.development_fee, 200.0);
        assert_relative_eq!(totals.performance_bonus, 20.0);

        let archive = ZipArchive::new(Cursor::new(output.artifacts.archive_zip.clone())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        let mut expected = vec!["part/上海分公司.xlsx", "part/北京分公司.xlsx"];
        expected.sort();
        assert_eq!(names, expected);

        let corrected = load_table(
            &Upload::new("corrected.xlsx", output.artifacts.corrected_xlsx.clone()),
            &FEE_TEXT_COLUMNS,
        )
        .unwrap();
        assert_eq!(corrected.headers, CORRECTED_COLUMNS.to_vec());
        assert_eq!(corrected.len(), 3);
        assert!(corrected.column_index("备注").is_none());
    }

    #[test]
    fn test_pass_through_text_does_not_abort() {
        let headers = FEE_REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut confirm = Table::new("confirm.xlsx", headers);
        let col = |name: &str| confirm.column_index(name).unwrap();
        let mut row = vec![Cell::Empty; FEE_REQUIRED_COLUMNS.len()];
        row[col(POLICY_NO)] = Cell::Text("P001".into());
        row[col(ENDORSEMENT_SEQ)] = Cell::Text("000".into());
        row[col(PRODUCT_CODE)] = Cell::Text("0460".into());
        row[col(BRANCH)] = Cell::Text("北京分公司".into());
        row[col(AGENT)] = Cell::Text("赵六".into());
        row[col(TOTAL_FEE_RATIO)] = Cell::Text("--".into());
        row[col(PREMIUM)] = Cell::Text("待补录".into());
        row[col(DEVELOPMENT_FEE_AMOUNT)] = Cell::Number(100.0);
        confirm.push_row(row);

        let headers = ROSTER_REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut roster = Table::new("roster.xlsx", headers);
        let policy_row = |policy_no: &str, amount: Cell| {
            vec![
                Cell::Text(policy_no.into()),
                Cell::Text("000".into()),
                Cell::Text("0460".into()),
                Cell::Text("张三".into()),
                Cell::Text("张三".into()),
                amount,
            ]
        };
        roster.push_row(policy_row("P001", Cell::Number(50000.0)));
        // Never referenced by a fee line
        roster.push_row(policy_row("P099", Cell::Text("不详".into())));

        let reconciliation = reconcile(&confirm, &roster, &ReconcileConfig::default()).unwrap();
        let line = &reconciliation.lines[0];
        assert_eq!(line.liability_insured_amount, Cell::Number(50000.0));

        let cells = line.cells();
        let out = |name: &str| CORRECTED_COLUMNS.iter().position(|c| *c == name).unwrap();
        assert_eq!(cells[out(TOTAL_FEE_RATIO)], Cell::Text("--".into()));
        assert_eq!(cells[out(PREMIUM)], Cell::Text("待补录".into()));
        assert_relative_eq!(reconciliation.pivot.totals().development_fee, 100.0);

        let artifacts = export(&reconciliation, &ReconcileConfig::default()).unwrap();
        let corrected = load_table(
            &Upload::new("corrected.xlsx", artifacts.corrected_xlsx),
            &FEE_TEXT_COLUMNS,
        )
        .unwrap();
        assert_eq!(corrected.rows()[0][out(TOTAL_FEE_RATIO)], Cell::Text("--".into()));
    }

    #[test]
    fn test_conflicting_roster_aborts_run() {
        let roster = roster_upload(&[
            ("P001", "001", "0460", "张三", 50000.0),
            ("P001", "001", "0460", "张三", 70000.0),
        ]);
        let err = run(&sample_confirm(), &roster, &ReconcileConfig::default()).unwrap_err();
        match err {
            ReconcileError::JoinCardinality(e) => {
                assert_eq!(e.key, JoinKey::new("P001", "001", "0460"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_roster_column_aborts_run() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, POLICY_NO).unwrap();
        sheet.write_string(1, 0, "P001").unwrap();
        let roster = Upload::new("roster.xlsx", workbook.save_to_buffer().unwrap());

        let err = run(&sample_confirm(), &roster, &ReconcileConfig::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::Schema(_)));
        assert!(err.to_string().contains(ENDORSEMENT_NO));
    }

    #[test]
    fn test_unreadable_upload_aborts_run() {
        let broken = Upload::new("roster.xls", b"garbage".to_vec());
        let err = run(&sample_confirm(), &broken, &ReconcileConfig::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::Load(_)));
    }
}
