pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::{Result, SheetAiError};
use indicatif::{ProgressBar, ProgressStyle};
use sheet_ai_common::{build_analysis_prompt, extract_with_tier, ResultMarkers, Tier};
use std::time::Duration;

/// 分析結果（抽出結果 + 完全な回答）
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: String,
    pub full_response: String,
    pub tier: Tier,
}

/// 回答テキストから結果部分を抽出
pub fn interpret_response(full_response: String, markers: &ResultMarkers) -> AnalysisOutcome {
    let extraction = extract_with_tier(&full_response, markers);
    AnalysisOutcome {
        result: extraction.text,
        full_response,
        tier: extraction.tier,
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Markdownデータと指示をGeminiへ送り、結果部分を抽出する
pub async fn analyze(
    client: &GeminiClient,
    markdown: &str,
    instruction: &str,
    markers: &ResultMarkers,
    verbose: bool,
) -> Result<AnalysisOutcome> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(SheetAiError::EmptyInstruction);
    }

    let prompt = build_analysis_prompt(markdown, instruction);
    if verbose {
        println!("  モデル: {}", client.model());
        println!("  プロンプト長: {} chars", prompt.chars().count());
    }

    let bar = spinner("Geminiが分析中...");
    let response = client.generate(&prompt).await;
    bar.finish_and_clear();
    let response = response?;

    if verbose {
        let preview: String = response.chars().take(500).collect();
        println!("  レスポンス長: {} chars", response.chars().count());
        println!("  レスポンス: {}", preview);
    }

    let outcome = interpret_response(response, markers);
    if verbose {
        println!("  抽出方法: {}", outcome.tier);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_response_marker() {
        let outcome = interpret_response(
            "各CustProgの売上を集計しました。\n\n結果: 東京が最も高い（320）\n".to_string(),
            &ResultMarkers::default(),
        );
        assert_eq!(outcome.result, "東京が最も高い（320）");
        assert_eq!(outcome.tier, Tier::Marker);
        assert!(outcome.full_response.starts_with("各CustProg"));
    }

    #[test]
    fn test_interpret_response_fallback() {
        let outcome = interpret_response("段落1\n\n段落2".to_string(), &ResultMarkers::default());
        assert_eq!(outcome.result, "段落2");
        assert_eq!(outcome.tier, Tier::LastParagraph);
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_instruction() {
        let client = GeminiClient::new("KEY", "gemini-2.5-flash", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let result = analyze(&client, "## S", "   ", &ResultMarkers::default(), false).await;
        assert!(matches!(result, Err(SheetAiError::EmptyInstruction)));
    }
}
