//! 統合データのExcel出力

use crate::error::{Result, SheetAiError};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use sheet_ai_common::{CellValue, Table};
use std::path::Path;

pub const SHEET_NAME: &str = "Combined_Data";

fn xlsx_err(e: XlsxError) -> SheetAiError {
    SheetAiError::ExcelGeneration(e.to_string())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b).map_err(xlsx_err)?;
        }
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64).map_err(xlsx_err)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f).map_err(xlsx_err)?;
        }
        CellValue::Text(s) | CellValue::DateTime(s) => {
            worksheet.write_string(row, col, s).map_err(xlsx_err)?;
        }
    }
    Ok(())
}

/// 表を1シートのxlsxとして保存（1行目はヘッダー）
pub fn generate_excel(table: &Table, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_err)?;

    for (idx, name) in table.columns.iter().enumerate() {
        let col = column_number(idx)?;
        worksheet
            .write_string_with_format(0, col, name, &header_format)
            .map_err(xlsx_err)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = u32::try_from(row_idx + 1)
            .map_err(|_| SheetAiError::ExcelGeneration(format!("行数が多すぎます: {}", row_idx + 1)))?;
        for (idx, value) in row.iter().enumerate() {
            write_cell(worksheet, excel_row, column_number(idx)?, value)?;
        }
    }

    workbook.save(output_path).map_err(xlsx_err)?;
    Ok(())
}

fn column_number(idx: usize) -> Result<u16> {
    u16::try_from(idx).map_err(|_| SheetAiError::ExcelGeneration(format!("列数が多すぎます: {}", idx + 1)))
}
