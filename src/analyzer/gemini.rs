//! Gemini API連携
//!
//! generateContent エンドポイントへプロンプトを送り、
//! レスポンス封筒（candidates[0].content.parts）から本文テキストを取り出す。

use crate::config::Config;
use crate::error::{Result, SheetAiError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SheetAiError::ApiCall(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// 設定（APIキー・モデル・タイムアウト）から生成
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        Self::new(api_key, &config.model, Duration::from_secs(config.timeout_seconds))
    }

    /// 接続先を差し替える（テスト・プロキシ用）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// プロンプトを送信し、回答テキストを返す
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetAiError::ApiCall(format!("エラーが発生しました: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SheetAiError::ApiCall(format!("レスポンス読み込みエラー: {}", e)))?;

        if !status.is_success() {
            return Err(SheetAiError::ApiCall(format!("{} - {}", status.as_u16(), text)));
        }

        parse_response_text(&text)
    }
}

/// レスポンス本文（JSON）から最初の候補のテキストを取り出す
pub fn parse_response_text(body: &str) -> Result<String> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| SheetAiError::ApiParse(format!("JSONパースエラー: {}", e)))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| SheetAiError::ApiParse("応答の解析に問題があります。".into()))
}
