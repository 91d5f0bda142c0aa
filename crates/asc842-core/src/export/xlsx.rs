use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::error::LeaseAccountingError;
use crate::LeaseAccountingResult;

use super::{CellValue, Workbook};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Render the workbook as an in-memory `.xlsx` file. The header row is bold
/// and columns are sized from their contents.
pub fn to_xlsx_bytes(workbook: &Workbook) -> LeaseAccountingResult<Vec<u8>> {
    let mut book = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    for sheet in &workbook.sheets {
        let worksheet = book.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }

        for (idx, row) in sheet.rows.iter().enumerate() {
            let r = (idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match cell {
                    CellValue::Text(text) => {
                        worksheet.write_string(r, c, text)?;
                    }
                    CellValue::Number(n) => {
                        let value = n.to_f64().ok_or_else(|| {
                            LeaseAccountingError::ExportError(format!(
                                "{n} cannot be written as a spreadsheet number"
                            ))
                        })?;
                        worksheet.write_number(r, c, value)?;
                    }
                    CellValue::Bool(flag) => {
                        worksheet.write_boolean(r, c, *flag)?;
                    }
                    CellValue::Empty => {}
                }
            }
        }

        for (col, width) in sheet.column_widths().into_iter().enumerate() {
            worksheet.set_column_width(col as u16, width as f64)?;
        }
    }

    Ok(book.save_to_buffer()?)
}

pub fn write_xlsx(workbook: &Workbook, path: &Path) -> LeaseAccountingResult<()> {
    let bytes = to_xlsx_bytes(workbook)?;
    std::fs::write(path, bytes).map_err(|e| {
        LeaseAccountingError::ExportError(format!("Failed to write {}: {e}", path.display()))
    })
}
