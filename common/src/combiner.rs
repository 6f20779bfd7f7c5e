//! 全シート立て積み
//!
//! 各シートの行に `CustProg` 列（シート名）を先頭に付与し、
//! 入力順に縦連結した統合テーブルと、シートごと + 統合のMarkdown文書を生成する。
//!
//! - 行のないシートは完全に無視する（文書・ラベル・シート数のいずれにも現れない）
//! - 残るシートが無い場合は `Error::EmptyInput`

use crate::error::{Error, Result};
use crate::markdown::render_table;
use crate::types::{SourceTable, Table, CUST_PROG};
use serde::{Deserialize, Serialize};

/// 統合セクションの見出し
pub const UNIFIED_HEADING: &str = "全シート統合データ";

/// シートごとの件数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub label: String,
    pub row_count: usize,
}

/// 立て積みの結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSheets {
    pub markdown: String,
    pub unified: Table,
    pub labels: Vec<String>,
    pub summaries: Vec<SheetSummary>,
}

impl CombinedSheets {
    pub fn sheet_count(&self) -> usize {
        self.labels.len()
    }

    pub fn total_rows(&self) -> usize {
        self.unified.len()
    }
}

/// シートに `CustProg` 列を付与した表を作成
pub fn tag_rows(sheet: &SourceTable) -> Result<Table> {
    if sheet.rows.iter().any(|r| r.contains(CUST_PROG)) {
        return Err(Error::ReservedColumn {
            label: sheet.label.clone(),
        });
    }

    let mut columns = vec![CUST_PROG.to_string()];
    columns.extend(sheet.columns());

    let mut table = Table::new(columns);
    for record in &sheet.rows {
        let mut tagged = record.clone();
        tagged.insert(CUST_PROG, sheet.label.as_str());
        table.push_record(&tagged);
    }
    Ok(table)
}

fn sheet_section(label: &str, row_count: usize, tagged: &Table) -> String {
    format!(
        "## {}\n\n**データ件数**: {} 行\n\n{}\n\n---\n\n",
        label,
        row_count,
        render_table(tagged)
    )
}

fn unified_section(unified: &Table, sheet_count: usize) -> String {
    format!(
        "## {}\n\n**総データ件数**: {} 行\n**シート数**: {} シート\n\n{}\n\n",
        UNIFIED_HEADING,
        unified.len(),
        sheet_count,
        render_table(unified)
    )
}

/// 読み込み済みのシート群を立て積み
pub fn combine(sheets: &[SourceTable]) -> Result<CombinedSheets> {
    try_combine(sheets.iter().cloned().map(Ok))
}

/// 逐次読み込みされるシート群を立て積み
///
/// 読み込み側のエラー（`Error::SourceRead` 等）は最初の1件をそのまま返す。
pub fn try_combine<I>(sheets: I) -> Result<CombinedSheets>
where
    I: IntoIterator<Item = Result<SourceTable>>,
{
    let mut markdown = String::new();
    let mut tagged_tables = Vec::new();
    let mut labels = Vec::new();
    let mut summaries = Vec::new();

    for sheet in sheets {
        let sheet = sheet?;
        if sheet.is_empty() {
            continue;
        }

        let tagged = tag_rows(&sheet)?;
        markdown.push_str(&sheet_section(&sheet.label, sheet.rows.len(), &tagged));

        summaries.push(SheetSummary {
            label: sheet.label.clone(),
            row_count: sheet.rows.len(),
        });
        labels.push(sheet.label);
        tagged_tables.push(tagged);
    }

    if tagged_tables.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut unified = Table::new(vec![CUST_PROG.to_string()]);
    for tagged in &tagged_tables {
        unified.append(tagged);
    }

    markdown.push_str(&unified_section(&unified, labels.len()));

    Ok(CombinedSheets {
        markdown,
        unified,
        labels,
        summaries,
    })
}
