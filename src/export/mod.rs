pub mod csv;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use chrono::{DateTime, Local};
use sheet_ai_common::CombinedSheets;
use std::path::{Path, PathBuf};

/// ファイル名用のタイムスタンプ（例: 20250118_093012）
pub fn file_stamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

fn stamped_path(output_dir: &Path, prefix: &str, now: &DateTime<Local>, extension: &str) -> PathBuf {
    output_dir.join(format!("{}_{}.{}", prefix, file_stamp(now), extension))
}

/// 先頭 `max_chars` 文字までのプレビュー（超過時は `...` を付ける）
pub fn preview_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// 分析結果のテキスト（ダウンロード用）
pub fn render_result_text(result: &str, now: &DateTime<Local>) -> String {
    format!(
        "分析結果\n===============\n\n{}\n\n分析日時: {}\n",
        result,
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn write_markdown(markdown: &str, output_dir: &Path, now: &DateTime<Local>) -> Result<PathBuf> {
    let path = stamped_path(output_dir, "excel_data", now, "md");
    std::fs::write(&path, markdown)?;
    Ok(path)
}

pub fn write_result_text(result: &str, output_dir: &Path, now: &DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = stamped_path(output_dir, "analysis_result", now, "txt");
    std::fs::write(&path, render_result_text(result, now))?;
    Ok(path)
}

/// 立て積み結果を指定形式で書き出し、出力先パスを返す
pub fn export_combined(
    combined: &CombinedSheets,
    format: &ExportFormat,
    output_dir: &Path,
    now: &DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    if format.includes_markdown() {
        written.push(write_markdown(&combined.markdown, output_dir, now)?);
    }

    if format.includes_csv() {
        let path = stamped_path(output_dir, "combined_data", now, "csv");
        self::csv::generate_csv(&combined.unified, &path)?;
        written.push(path);
    }

    if format.includes_excel() {
        let path = stamped_path(output_dir, "combined_data", now, "xlsx");
        excel::generate_excel(&combined.unified, &path)?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 18, 9, 30, 12).unwrap()
    }

    #[test]
    fn test_file_stamp() {
        assert_eq!(file_stamp(&fixed_time()), "20250118_093012");
    }

    #[test]
    fn test_preview_text() {
        assert_eq!(preview_text("あいうえお", 3), "あいう...");
        assert_eq!(preview_text("あいう", 3), "あいう");
    }

    #[test]
    fn test_render_result_text() {
        let text = render_result_text("東京が最大", &fixed_time());
        assert_eq!(
            text,
            "分析結果\n===============\n\n東京が最大\n\n分析日時: 2025-01-18 09:30:12\n"
        );
    }
}
