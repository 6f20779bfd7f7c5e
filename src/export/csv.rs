//! 統合データのCSV出力（UTF-8 BOM付き、Excelでそのまま開ける形式）

use crate::error::{Result, SheetAiError};
use sheet_ai_common::Table;
use std::io::Write;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn csv_err(e: impl std::fmt::Display) -> SheetAiError {
    SheetAiError::CsvGeneration(e.to_string())
}

/// 表をCSVとして書き出す（Nullは空フィールド）
pub fn write_csv<W: Write>(table: &Table, mut out: W) -> Result<()> {
    out.write_all(UTF8_BOM)?;

    let mut writer = ::csv::Writer::from_writer(out);
    writer.write_record(&table.columns).map_err(csv_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn generate_csv(table: &Table, output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_csv(table, std::io::BufWriter::new(file))
}
