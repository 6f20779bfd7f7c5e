//! セッション保存モジュール
//!
//! 直近に変換したブックの立て積み結果と、最後の分析結果を
//! 作業フォルダの `.sheet-ai-session.json` に保存する。
//! 新しいブックを変換すると内容は丸ごと置き換わる。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sheet_ai_common::CombinedSheets;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

const SESSION_FILE_NAME: &str = ".sheet-ai-session.json";

/// セッションファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 変換元ブックのパス
    pub source_path: String,
    /// 変換元ブックのSHA-256
    pub source_hash: String,
    /// 立て積み結果
    pub combined: CombinedSheets,
    /// 最後の分析結果
    #[serde(default)]
    pub last_result: Option<StoredResult>,
}

/// 保存された分析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub instruction: String,
    pub result: String,
    pub full_response: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub analyzed_at: String,
}

impl Session {
    const CURRENT_VERSION: u32 = 1;

    pub fn new(source_path: &Path, source_hash: String, combined: CombinedSheets) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            source_path: source_path.display().to_string(),
            source_hash,
            combined,
            last_result: None,
        }
    }

    pub fn session_path(folder: &Path) -> PathBuf {
        folder.join(SESSION_FILE_NAME)
    }

    /// セッションを読み込み（無い・壊れている・バージョン違いはNone）
    pub fn load(folder: &Path) -> Option<Self> {
        let path = Self::session_path(folder);
        let file = File::open(&path).ok()?;

        match serde_json::from_reader::<_, Session>(BufReader::new(file)) {
            Ok(session) if session.version == Self::CURRENT_VERSION => Some(session),
            Ok(_) => {
                eprintln!("セッションのバージョンが異なるため無視します: {}", path.display());
                None
            }
            Err(_) => None,
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::session_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// セッションファイルを削除（存在しなければfalse）
    pub fn clear(folder: &Path) -> Result<bool> {
        let path = Self::session_path(folder);
        if path.exists() {
            std::fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// 指定ブックの内容がセッション作成時から変わっているか
    pub fn is_stale(&self, source: &Path) -> bool {
        compute_file_hash(source)
            .map(|hash| hash != self.source_hash)
            .unwrap_or(true)
    }

    pub fn record_result(&mut self, result: StoredResult) {
        self.last_result = Some(result);
    }
}

/// ファイル内容のSHA-256（16進）
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
