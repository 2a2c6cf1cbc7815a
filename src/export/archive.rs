//! Per-branch zip archive of two-sheet workbooks

use std::io::{Cursor, Write};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::workbook::branch_workbook;
use crate::config::ReconcileConfig;
use crate::error::ExportError;
use crate::records::FeeLine;
use crate::reconcile::PivotSummary;

/// Build the archive holding one workbook per branch of the pivot
///
/// Only one branch workbook is held in memory at a time.
pub fn branch_archive(
    lines: &[FeeLine],
    pivot: &PivotSummary,
    config: &ReconcileConfig,
) -> Result<Vec<u8>, ExportError> {
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let branches = pivot.branches();

    for branch in &branches {
        let workbook = branch_workbook(lines, pivot, branch, config)?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        archive.start_file(config.archive_entry_name(branch), options)?;
        archive.write_all(&workbook)?;
    }

    let bytes = archive.finish()?.into_inner();
    debug!("Archived {} branch workbooks ({} bytes)", branches.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::fixtures::fee;
    use crate::reconcile::{join_identities, IdentityLookup};
    use crate::table::{load_table, Cell, Upload};
    use calamine::{open_workbook_auto_from_rs, Reader};
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_one_entry_per_branch() {
        let mut records = vec![
            fee("P001", "000", "0460", "北京", "赵六", Cell::Number(50000.0)),
            fee("P002", "000", "0301", "北京", "钱七", Cell::Empty),
            fee("P003", "000", "0301", "北京", "钱七", Cell::Empty),
            fee("P004", "000", "0301", "上海", "孙八", Cell::Empty),
            fee("P005", "000", "0301", "广州", "周九", Cell::Empty),
        ];
        // No agent: kept in the full table but outside the pivot and archive
        records[4].agent = None;
        let lines = join_identities(records, &IdentityLookup::default());
        let pivot = PivotSummary::from_lines(&lines);
        let config = ReconcileConfig::default();

        let bytes = branch_archive(&lines, &pivot, &config).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut workbook_bytes = Vec::new();
        archive
            .by_name("part/北京.xlsx")
            .unwrap()
            .read_to_end(&mut workbook_bytes)
            .unwrap();
        assert!(archive.by_name("part/广州.xlsx").is_err());

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(workbook_bytes.clone())).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string(), "Sheet2".to_string()]);
        let pivot_sheet = workbook.worksheet_range("Sheet2").unwrap();
        // Header plus the two Beijing agents
        assert_eq!(pivot_sheet.height(), 3);

        let detail = load_table(&Upload::new("北京.xlsx", workbook_bytes), &[]).unwrap();
        assert_eq!(detail.len(), 3);
        assert!(detail
            .rows()
            .iter()
            .all(|row| row[7] == Cell::Text("北京".into())));
    }

    #[test]
    fn test_empty_pivot_gives_empty_archive() {
        let bytes = branch_archive(&[], &PivotSummary::default(), &ReconcileConfig::default()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
