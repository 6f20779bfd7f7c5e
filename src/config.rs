use crate::error::{Result, SheetAiError};
use serde::{Deserialize, Serialize};
use sheet_ai_common::ResultMarkers;
use std::path::PathBuf;

const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
    /// 結果抽出に使うマーカー（照合順）
    pub markers: ResultMarkers,
    /// Markdownプレビューの最大文字数
    pub preview_chars: usize,
    /// 統合データプレビューの最大行数
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            timeout_seconds: 60,
            markers: ResultMarkers::default(),
            preview_chars: 2000,
            preview_rows: 100,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SheetAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sheet-ai").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SheetAiError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }

    /// マーカー未設定（空配列）の場合はデフォルトに戻す
    pub fn result_markers(&self) -> ResultMarkers {
        if self.markers.is_empty() {
            ResultMarkers::default()
        } else {
            self.markers.clone()
        }
    }
}
