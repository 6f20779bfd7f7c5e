use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`sheet-ai config --set-api-key YOUR_KEY` で設定するか、環境変数 GEMINI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("分析指示を入力してください")]
    EmptyInstruction,

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV生成エラー: {0}")]
    CsvGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("セッションがありません。先に `sheet-ai convert <FILE>` を実行してください")]
    NoSession,

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] sheet_ai_common::Error),
}

pub type Result<T> = std::result::Result<T, SheetAiError>;
