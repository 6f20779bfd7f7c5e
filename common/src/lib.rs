//! Sheet AI Common Library
//!
//! CLIとテストで共有される、IOを行わない中核処理:
//! - 全シート立て積みとMarkdown描画
//! - AI回答からの結果抽出

pub mod types;
pub mod error;
pub mod markdown;
pub mod combiner;
pub mod extractor;
pub mod prompts;

pub use types::{CellValue, Record, SourceTable, Table, CUST_PROG};
pub use error::{Error, Result};
pub use markdown::{parse_markdown_table, render_table};
pub use combiner::{combine, try_combine, CombinedSheets, SheetSummary, UNIFIED_HEADING};
pub use extractor::{extract, extract_with_tier, Extraction, ResultMarkers, Tier, DEFAULT_RESULT_MARKERS};
pub use prompts::build_analysis_prompt;
