//! Xlsx serialization of corrected lines and pivot groups

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::config::ReconcileConfig;
use crate::error::ExportError;
use crate::records::columns::{CORRECTED_COLUMNS, PIVOT_COLUMNS};
use crate::records::FeeLine;
use crate::reconcile::{PivotKey, PivotSummary, PivotTotals};
use crate::table::{to_excel_serial, Cell};

/// Number format applied to timestamp cells
pub const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), ExportError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

fn write_cells(
    sheet: &mut Worksheet,
    row: u32,
    cells: &[Cell],
    date_format: &Format,
) -> Result<(), ExportError> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            Cell::Empty => {}
            Cell::Text(s) if s.is_empty() => {}
            Cell::Text(s) => {
                sheet.write_string(row, col, s.as_str())?;
            }
            Cell::Number(v) => {
                sheet.write_number(row, col, *v)?;
            }
            Cell::Bool(b) => {
                sheet.write_boolean(row, col, *b)?;
            }
            Cell::DateTime(dt) => {
                sheet.write_number_with_format(row, col, to_excel_serial(dt), date_format)?;
            }
        }
    }
    Ok(())
}

/// Write corrected lines under the corrected header; returns rows written
pub fn write_lines_sheet<'a>(
    sheet: &mut Worksheet,
    lines: impl IntoIterator<Item = &'a FeeLine>,
) -> Result<usize, ExportError> {
    let date_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);
    write_header(sheet, &CORRECTED_COLUMNS)?;

    let mut written = 0usize;
    for line in lines {
        written += 1;
        write_cells(sheet, written as u32, &line.cells(), &date_format)?;
    }
    Ok(written)
}

/// Write pivot groups with the branch and agent index columns leading
pub fn write_pivot_sheet<'a>(
    sheet: &mut Worksheet,
    groups: impl IntoIterator<Item = (&'a PivotKey, &'a PivotTotals)>,
) -> Result<usize, ExportError> {
    write_header(sheet, &PIVOT_COLUMNS)?;

    let mut written = 0usize;
    for (key, totals) in groups {
        written += 1;
        let row = written as u32;
        sheet.write_string(row, 0, key.branch.as_str())?;
        sheet.write_string(row, 1, key.agent.as_str())?;
        sheet.write_number(row, 2, totals.development_fee)?;
        sheet.write_number(row, 3, totals.performance_bonus)?;
    }
    Ok(written)
}

/// Full corrected table as a single-sheet workbook
pub fn corrected_workbook(lines: &[FeeLine]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    write_lines_sheet(workbook.add_worksheet(), lines)?;
    Ok(workbook.save_to_buffer()?)
}

/// Pivot summary as a single-sheet workbook
pub fn pivot_workbook(pivot: &PivotSummary) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    write_pivot_sheet(workbook.add_worksheet(), pivot.iter())?;
    Ok(workbook.save_to_buffer()?)
}

/// Two-sheet workbook of one branch: its corrected lines, then its pivot rows
pub fn branch_workbook(
    lines: &[FeeLine],
    pivot: &PivotSummary,
    branch: &str,
    config: &ReconcileConfig,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let detail = workbook.add_worksheet().set_name(&config.detail_sheet_name)?;
    write_lines_sheet(detail, lines.iter().filter(|line| line.in_branch(branch)))?;

    let summary = workbook.add_worksheet().set_name(&config.pivot_sheet_name)?;
    write_pivot_sheet(summary, pivot.branch_slice(branch))?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::fixtures::fee;
    use crate::reconcile::{join_identities, IdentityLookup};
    use crate::table::{load_table, Upload};
    use chrono::NaiveDate;

    fn sample_lines() -> Vec<FeeLine> {
        let mut records = vec![
            fee("P001", "000", "0460", "北京", "赵六", Cell::Number(50000.0)),
            fee("P002", "001", "0301", "上海", "孙八", Cell::Text("未干预".into())),
            fee("P003", "000", "0301", "北京", "钱七", Cell::Empty),
        ];
        records[0].confirmed_at = Cell::DateTime(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        );
        records[0].fees.development_amount = Some(120.0);
        join_identities(records, &IdentityLookup::default())
    }

    #[test]
    fn test_corrected_workbook_reads_back() {
        let lines = sample_lines();
        let bytes = corrected_workbook(&lines).unwrap();
        let table = load_table(&Upload::new("out.xlsx", bytes), &["批单序号", "险种代码"]).unwrap();

        assert_eq!(table.headers, CORRECTED_COLUMNS.to_vec());
        assert_eq!(table.len(), 3);
        let row = &table.rows()[0];
        assert_eq!(row[1], Cell::Text("000".into()));
        assert_eq!(row[5], Cell::Text("0460".into()));
        assert_eq!(row[9], lines[0].confirmed_at);
        assert_eq!(row[20], Cell::Number(120.0));
        assert_eq!(row[24], Cell::Number(50000.0));
        assert_eq!(table.rows()[1][24], Cell::Text("未干预".into()));
    }

    #[test]
    fn test_pivot_workbook_keeps_index_columns() {
        let pivot = PivotSummary::from_lines(&sample_lines());
        let bytes = pivot_workbook(&pivot).unwrap();
        let table = load_table(&Upload::new("pivot.xlsx", bytes), &[]).unwrap();

        assert_eq!(table.headers, PIVOT_COLUMNS.to_vec());
        assert_eq!(table.len(), pivot.len());
        let first = pivot.iter().next().unwrap().0;
        assert_eq!(table.rows()[0][0], Cell::Text(first.branch.clone()));
        assert_eq!(table.rows()[0][1], Cell::Text(first.agent.clone()));
    }
}
