//! プロンプト生成モジュール
//!
//! Markdown化したExcelデータとユーザー指示を1つのプロンプトにまとめる。
//! 回答末尾に「結果:」を付けるよう指示し、抽出側のマーカー照合と対応させる。

/// 分析用プロンプト生成
///
/// # Arguments
/// * `markdown` - 立て積み済みのMarkdown文書（そのまま埋め込む）
/// * `instruction` - ユーザーの分析指示
///
/// # Returns
/// Geminiへ送信するプロンプト文字列
pub fn build_analysis_prompt(markdown: &str, instruction: &str) -> String {
    format!(
        r#"
以下のExcelデータ（Markdown形式）を分析してください：

{markdown}

ユーザーの指示：{instruction}

**重要**: 必ず最後に「結果:」で始まる明確な結論を提示してください。分析過程の説明は簡潔にし、結果を重視してください。
"#
    )
}
