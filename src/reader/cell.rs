//! calamineのセル値 → CellValue 変換とヘッダー正規化

use calamine::Data;
use sheet_ai_common::CellValue;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// calamineのセルをCellValueに変換
///
/// 空セル・空文字列はNull、エラーセルは表示文字列（`#DIV/0!` 等）になる。
pub fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::DateTime(datetime.format(DATETIME_FORMAT).to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// ヘッダー行を列名に変換
///
/// - 空セルは `Unnamed: {列番号}`
/// - 重複する列名は `名前.1`, `名前.2` ... に振り直す
pub fn header_names(cells: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());

    for (idx, cell) in cells.iter().enumerate() {
        let base = match to_cell_value(cell) {
            CellValue::Null => format!("Unnamed: {}", idx),
            value => value.to_string().trim().to_string(),
        };
        let base = if base.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            base
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }

    names
}

/// 全セルが空の行か
pub fn is_blank_row(cells: &[Data]) -> bool {
    cells.iter().all(|c| to_cell_value(c).is_null())
}
