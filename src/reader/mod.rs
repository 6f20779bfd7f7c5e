//! スプレッドシート読み込み
//!
//! calamineでブックを開き、シートをファイル順に1枚ずつ SourceTable へ変換する。
//! 各シートの使用範囲の1行目をヘッダーとして扱う。

mod cell;

pub use cell::{header_names, to_cell_value};

use crate::error::{Result, SheetAiError};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use sheet_ai_common::{Record, SourceTable};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// 対応拡張子
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

pub struct WorkbookReader {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl WorkbookReader {
    /// ブックを開く
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SheetAiError::FileNotFound(path.display().to_string()));
        }

        let workbook = open_workbook_auto(path)
            .map_err(|e| sheet_ai_common::Error::source_read(path.display().to_string(), e))?;
        let sheet_names = workbook.sheet_names();

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
            sheet_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// シート名（ファイル内の順序）
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// 1シートを読み込む
    pub fn read_sheet(&mut self, name: &str) -> sheet_ai_common::Result<SourceTable> {
        let range = self.workbook.worksheet_range(name).map_err(|e| {
            sheet_ai_common::Error::source_read(format!("{}:{}", self.path.display(), name), e)
        })?;
        Ok(range_to_table(name, &range))
    }

    /// 全シートを順に読み込むイテレータ（1シートずつ読み込む）
    pub fn sheets(&mut self) -> impl Iterator<Item = sheet_ai_common::Result<SourceTable>> + '_ {
        let names = self.sheet_names.clone();
        names.into_iter().map(move |name| self.read_sheet(&name))
    }
}

/// セル範囲をSourceTableに変換
///
/// 1行目はヘッダー。全セル空の行は読み飛ばす。
pub fn range_to_table(label: &str, range: &Range<Data>) -> SourceTable {
    let mut rows = range.rows();

    let header = match rows.next() {
        Some(cells) => header_names(cells),
        None => return SourceTable::new(label, Vec::new()),
    };

    let records = rows
        .filter(|cells| !cell::is_blank_row(cells))
        .map(|cells| {
            header
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let value = cells.get(idx).map(to_cell_value).unwrap_or_default();
                    (column.clone(), value)
                })
                .collect::<Record>()
        })
        .collect();

    SourceTable::new(label, records)
}

/// 拡張子が対応形式か
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
