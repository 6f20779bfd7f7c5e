//! Markdown/CSV/Excel出力の統合テスト

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Local, TimeZone};
use sheet_ai_common::{combine, CombinedSheets, Record, SourceTable};
use sheet_ai_rust::cli::ExportFormat;
use sheet_ai_rust::export::{self, excel};
use tempfile::tempdir;

fn create_combined() -> CombinedSheets {
    let sheets = vec![
        SourceTable::new(
            "東京",
            vec![
                Record::new().with("商品", "りんご").with("売上", 120i64),
                Record::new().with("商品", "みかん").with("売上", 80.5f64),
            ],
        ),
        SourceTable::new(
            "大阪",
            vec![Record::new().with("商品", "ぶどう").with("完売", true)],
        ),
    ];
    combine(&sheets).expect("立て積みに失敗")
}

#[test]
fn test_export_all_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    let now = Local.with_ymd_and_hms(2025, 1, 18, 9, 30, 12).unwrap();
    let combined = create_combined();

    let written = export::export_combined(&combined, &ExportFormat::All, dir.path(), &now)
        .expect("エクスポートに失敗");

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "excel_data_20250118_093012.md",
            "combined_data_20250118_093012.csv",
            "combined_data_20250118_093012.xlsx",
        ]
    );

    let markdown = std::fs::read_to_string(&written[0]).unwrap();
    assert_eq!(markdown, combined.markdown);

    let csv_bytes = std::fs::read(&written[1]).unwrap();
    let csv_text = String::from_utf8(csv_bytes[3..].to_vec()).unwrap();
    let mut lines = csv_text.lines();
    assert_eq!(lines.next(), Some("CustProg,商品,売上,完売"));
    assert_eq!(lines.next(), Some("東京,りんご,120,"));
    assert_eq!(lines.next(), Some("東京,みかん,80.5,"));
    assert_eq!(lines.next(), Some("大阪,ぶどう,,true"));
}

#[test]
fn test_export_markdown_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let now = Local::now();

    let written = export::export_combined(&create_combined(), &ExportFormat::Markdown, dir.path(), &now)
        .unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(written[0].extension().unwrap(), "md");
}

#[test]
fn test_excel_generation_readable() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("combined.xlsx");
    let combined = create_combined();

    excel::generate_excel(&combined.unified, &output_path).expect("Excel生成に失敗");
    assert!(output_path.exists(), "Excelファイルが作成されていない");

    let mut workbook: Xlsx<_> = open_workbook(&output_path).expect("Excelを開けない");
    assert_eq!(workbook.sheet_names(), vec![excel::SHEET_NAME.to_string()]);

    let range = workbook.worksheet_range(excel::SHEET_NAME).unwrap();
    assert_eq!(range.get_size(), (4, 4));
    assert_eq!(range.get((0, 0)), Some(&Data::String("CustProg".into())));
    assert_eq!(range.get((1, 2)), Some(&Data::Float(120.0)));
    assert_eq!(range.get((3, 3)), Some(&Data::Bool(true)));
    assert_eq!(range.get((3, 2)), Some(&Data::Empty));
}

#[test]
fn test_write_result_text() {
    let dir = tempdir().expect("Failed to create temp dir");
    let now = Local.with_ymd_and_hms(2025, 1, 18, 9, 30, 12).unwrap();

    let path = export::write_result_text("東京が最大", &dir.path().join("out"), &now).unwrap();

    assert!(path.ends_with("analysis_result_20250118_093012.txt"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("分析結果\n===============\n\n東京が最大\n"));
    assert!(text.contains("分析日時: 2025-01-18 09:30:12"));
}
