//! 表データの型定義
//!
//! CLIと読み込み層で共有される型:
//! - CellValue: セル値（欠損は Null）
//! - Record: 列名 → 値 の順序付きマップ（1行分）
//! - SourceTable: シート名 + 行
//! - Table: 和集合スキーマの表（欠損列は Null 埋め）

use serde::{Deserialize, Serialize};
use std::fmt;

/// シート名を保持する合成列
pub const CUST_PROG: &str = "CustProg";

/// セル値
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// `YYYY-MM-DD HH:MM:SS` 形式
    DateTime(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => {
                // 整数値の浮動小数は小数部を出さない（100.0 → 100）
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{:.0}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            CellValue::Text(s) | CellValue::DateTime(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// 1行分のデータ（列名 → 値、列順を保持）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列を追加したRecordを返す（ビルダー用）
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// 列を設定（同名の列があれば上書き）
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

/// 入力シート（シート名 + 行）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceTable {
    pub label: String,
    pub rows: Vec<Record>,
}

impl SourceTable {
    pub fn new(label: impl Into<String>, rows: Vec<Record>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 全行の列の和集合（初出順）
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for record in &self.rows {
            for column in record.columns() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }
        columns
    }
}

/// 和集合スキーマの表
///
/// 全行が `columns.len()` 個の値を持ち、元データに無い列は `Null` で埋める。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// 指定行・列の値（列が無ければNone）
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Recordを現在のスキーマに合わせて追加（欠損列は Null）
    ///
    /// スキーマに無い列は無視されるため、事前に `extend_columns` で広げておくこと。
    pub fn push_record(&mut self, record: &Record) {
        let row = self
            .columns
            .iter()
            .map(|c| record.get(c).cloned().unwrap_or_default())
            .collect();
        self.rows.push(row);
    }

    /// 未知の列を末尾に追加し、既存行は Null で埋める
    pub fn extend_columns<'a>(&mut self, columns: impl IntoIterator<Item = &'a str>) {
        for column in columns {
            if self.column_index(column).is_none() {
                self.columns.push(column.to_string());
                for row in &mut self.rows {
                    row.push(CellValue::Null);
                }
            }
        }
    }

    /// 別の表を縦に連結（列は和集合、初出順）
    pub fn append(&mut self, other: &Table) {
        self.extend_columns(other.columns.iter().map(String::as_str));
        let mapping: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|c| other.column_index(c))
            .collect();
        for source_row in &other.rows {
            let row = mapping
                .iter()
                .map(|idx| {
                    idx.and_then(|i| source_row.get(i).cloned())
                        .unwrap_or_default()
                })
                .collect();
            self.rows.push(row);
        }
    }

    /// 列が数値のみで構成されるか（Nullは無視、全てNullならfalse）
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        let mut seen = false;
        for row in &self.rows {
            match row.get(idx) {
                Some(CellValue::Null) | None => {}
                Some(v) if v.is_numeric() => seen = true,
                Some(_) => return false,
            }
        }
        seen
    }
}
