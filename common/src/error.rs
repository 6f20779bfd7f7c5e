//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 行を持つシートが1つもない
    #[error("データを含むシートがありません")]
    EmptyInput,

    /// 上流（スプレッドシート読み込み）の失敗。文脈を保持する
    #[error("シート読み込みエラー ({source_name}): {message}")]
    SourceRead { source_name: String, message: String },

    /// シートが予約列 `CustProg` を既に持っている
    #[error("シート '{label}' に予約列 CustProg が既に存在します")]
    ReservedColumn { label: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 読み込みエラーを文脈付きで生成
    pub fn source_read(source_name: impl Into<String>, message: impl ToString) -> Self {
        Error::SourceRead {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
