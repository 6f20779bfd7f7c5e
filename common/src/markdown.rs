//! Markdownテーブル描画・再パース
//!
//! パイプ区切りの表を出力する:
//!
//! ```text
//! | CustProg   | 商品   |   売上 |
//! |:-----------|:-------|-------:|
//! | 東京       | りんご |    120 |
//! ```
//!
//! - 各セルは列の表示幅まで空白で埋める（全角は幅2）
//! - 数値のみの列は右寄せ（区切り行 `---:`）、それ以外は左寄せ（`:---`）
//! - ヘッダー・セル内の `\` は `\\`、`|` は `\|`、改行は `<br>`、元から含まれる `<br>` は `\<br>` にエスケープ

use crate::error::{Error, Result};
use crate::types::{CellValue, Table};
use unicode_width::UnicodeWidthStr;

const LINE_BREAK: &str = "<br>";

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// 文字列をMarkdownテーブル用にエスケープ
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("\r\n") {
            out.push_str(LINE_BREAK);
            rest = &rest[2..];
            continue;
        }
        match c {
            '\n' => out.push_str(LINE_BREAK),
            '\\' | '|' => {
                out.push('\\');
                out.push(c);
            }
            // 元から含まれる <br> は改行と区別する
            '<' if rest.starts_with(LINE_BREAK) => out.push_str("\\<"),
            _ => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn escape_cell(value: &CellValue) -> String {
    escape_text(&value.to_string())
}

/// `escape_text` の逆変換
fn unescape_text(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut rest = cell;
    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            if let Some(next) = rest[1..].chars().next() {
                out.push(next);
                rest = &rest[1 + next.len_utf8()..];
                continue;
            }
        } else if rest.starts_with(LINE_BREAK) {
            out.push('\n');
            rest = &rest[LINE_BREAK.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

/// 表をMarkdownのパイプテーブルとして描画（末尾改行なし）
pub fn render_table(table: &Table) -> String {
    let header: Vec<String> = table
        .columns
        .iter()
        .map(|c| escape_text(c))
        .collect();
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(escape_cell).collect())
        .collect();

    let aligns: Vec<Align> = (0..header.len())
        .map(|idx| {
            if table.is_numeric_column(idx) {
                Align::Right
            } else {
                Align::Left
            }
        })
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            body.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.width())
                .chain(std::iter::once(name.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 2);

    let header_cells: Vec<String> = header
        .iter()
        .zip(&widths)
        .zip(&aligns)
        .map(|((name, &w), &a)| pad(name, w, a))
        .collect();
    lines.push(format!("| {} |", header_cells.join(" | ")));

    let separator: Vec<String> = widths
        .iter()
        .zip(&aligns)
        .map(|(&w, a)| match a {
            Align::Left => format!(":{}", "-".repeat(w + 1)),
            Align::Right => format!("{}:", "-".repeat(w + 1)),
        })
        .collect();
    lines.push(format!("|{}|", separator.join("|")));

    for row in &body {
        let cells: Vec<String> = widths
            .iter()
            .zip(&aligns)
            .enumerate()
            .map(|(idx, (&w, &a))| pad(row.get(idx).map(String::as_str).unwrap_or(""), w, a))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

/// パイプ区切りの1行をセルに分割（`\` に続く文字は区切りとみなさない）
fn split_row(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut ended_on_pipe = false;
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        ended_on_pipe = false;
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '|' => {
                cells.push(std::mem::take(&mut current));
                ended_on_pipe = true;
            }
            _ => current.push(c),
        }
    }
    if !ended_on_pipe {
        cells.push(current);
    }

    cells
        .into_iter()
        .map(|cell| unescape_text(cell.trim()))
        .collect()
}

fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// 文書中の最初のパイプテーブルを (ヘッダー, 行) として読み戻す
///
/// 空セルは空文字列になる（Null と空文字列は区別されない）。
/// 各セルは前後の空白を除いて返すため、値の先頭・末尾の空白は復元されない。
pub fn parse_markdown_table(markdown: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let lines: Vec<&str> = markdown.lines().collect();

    let start = lines
        .windows(2)
        .position(|pair| pair[0].trim_start().starts_with('|') && is_separator_row(pair[1]))
        .ok_or_else(|| Error::Parse("Markdownテーブルが見つかりません".into()))?;

    let header = split_row(lines[start]);
    let rows = lines[start + 2..]
        .iter()
        .take_while(|line| line.trim_start().starts_with('|'))
        .map(|line| split_row(line))
        .collect();

    Ok((header, rows))
}
