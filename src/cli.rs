use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet-ai")]
#[command(about = "Excel全シートを立て積みしてMarkdown化し、Geminiで分析するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// セッションファイルを置くフォルダ（デフォルト: カレント）
    #[arg(long, global = true)]
    pub session_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Excelを立て積みしてMarkdown/CSV/Excelを出力
    Convert {
        /// Excelファイルのパス
        #[arg(required = true)]
        input: PathBuf,

        /// 出力フォルダ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (markdown/csv/excel/all)
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        /// 統合データのプレビューを表示
        #[arg(long)]
        preview: bool,

        /// セッションに保存しない
        #[arg(long)]
        no_session: bool,
    },

    /// 立て積みデータと指示をGeminiに送り、結果のみを表示
    Analyze {
        /// Excelファイル（省略時はセッションのデータを使用）
        input: Option<PathBuf>,

        /// 分析指示（省略時は対話入力）
        #[arg(short, long)]
        instruction: Option<String>,

        /// 完全な回答も表示
        #[arg(long)]
        full: bool,

        /// 結果テキストの出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 保存済みのAI回答から結果部分を抽出
    Extract {
        /// 回答テキストファイル（`-` で標準入力）
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 最新の分析結果を表示
    #[command(name = "result")]
    ShowResult {
        /// 結果テキストの出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// セッション管理
    Session {
        /// セッションを削除
        #[arg(long)]
        clear: bool,

        /// セッション情報を表示
        #[arg(long)]
        info: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Csv,
    Excel,
    All,
}

impl ExportFormat {
    pub fn includes_markdown(&self) -> bool {
        matches!(self, ExportFormat::Markdown | ExportFormat::All)
    }

    pub fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::All)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::All)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use markdown, csv, excel, or all", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::All => write!(f, "all"),
        }
    }
}
