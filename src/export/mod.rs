//! Spreadsheet and archive output of a reconciliation run

mod workbook;
mod archive;

pub use workbook::{
    branch_workbook, corrected_workbook, pivot_workbook, write_lines_sheet, write_pivot_sheet,
    DATETIME_NUM_FORMAT,
};
pub use archive::branch_archive;
