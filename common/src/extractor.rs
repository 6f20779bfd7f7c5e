//! AI回答からの結果抽出
//!
//! 抽出優先順位（上から順に試し、最初に得られたものを返す）:
//! 1. マーカー行（「結果:」等）以降の連続行
//! 2. 最後の段落
//! 3. 最後の文（「。」区切り）
//!
//! どの入力に対しても失敗せず、必ず文字列を返す。

use serde::{Deserialize, Serialize};

/// 結果マーカーのデフォルト一覧（この順で照合する）
pub const DEFAULT_RESULT_MARKERS: &[&str] = &[
    "結果:",
    "回答:",
    "結論:",
    "答え:",
    "要約:",
    "まとめ:",
    "Result:",
    "Answer:",
    "Conclusion:",
    "Summary:",
];

const SENTENCE_END: char = '。';

/// 結果マーカー（順序付き、大文字小文字を区別する部分一致）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMarkers(Vec<String>);

impl ResultMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            markers
                .into_iter()
                .map(Into::into)
                .filter(|m: &String| !m.is_empty())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 行に含まれる最初のマーカー（マーカー一覧の順で判定）
    pub fn find_in<'a>(&'a self, line: &str) -> Option<&'a str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|marker| line.contains(marker))
    }
}

impl Default for ResultMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_MARKERS.iter().copied())
    }
}

/// どの段階で抽出できたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Marker,
    LastParagraph,
    LastSentence,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Marker => write!(f, "マーカー"),
            Tier::LastParagraph => write!(f, "最終段落"),
            Tier::LastSentence => write!(f, "最終文"),
        }
    }
}

/// 抽出結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Capturing,
    Stopped,
}

/// マーカー行から始まる連続行を取得
///
/// 最初のマーカー行で取り込みを開始し、空行または `#` で始まる行で終了する。
/// 取り込み開始後の行はマーカーを含んでいてもそのまま取り込む。
pub fn capture_after_marker(text: &str, markers: &ResultMarkers) -> Vec<String> {
    let mut captured = Vec::new();
    let mut state = ScanState::Scanning;

    for line in text.split('\n') {
        let line = line.trim();
        state = match state {
            ScanState::Scanning => match markers.find_in(line) {
                Some(marker) => {
                    if let Some((_, after)) = line.split_once(marker) {
                        let after = after.trim();
                        if !after.is_empty() {
                            captured.push(after.to_string());
                        }
                    }
                    ScanState::Capturing
                }
                None => ScanState::Scanning,
            },
            ScanState::Capturing => {
                if line.is_empty() || line.starts_with('#') {
                    ScanState::Stopped
                } else {
                    captured.push(line.to_string());
                    ScanState::Capturing
                }
            }
            ScanState::Stopped => break,
        };
    }

    captured
}

/// 空行区切りの最後の段落
pub fn last_paragraph(text: &str) -> Option<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .last()
}

/// 「。」区切りの最後の文（末尾の空断片を飛ばして「。」を補う）
///
/// 「。」が無ければ入力をそのまま返す。
pub fn last_sentence(text: &str) -> String {
    let pieces: Vec<&str> = text.split(SENTENCE_END).collect();
    if pieces.len() > 1 {
        format!("{}{}", pieces[pieces.len() - 2], SENTENCE_END)
    } else {
        text.to_string()
    }
}

/// 結果部分を抽出し、使用した段階も返す
pub fn extract_with_tier(text: &str, markers: &ResultMarkers) -> Extraction {
    let captured = capture_after_marker(text, markers);
    if !captured.is_empty() {
        return Extraction {
            text: captured.join("\n"),
            tier: Tier::Marker,
        };
    }

    if let Some(paragraph) = last_paragraph(text) {
        return Extraction {
            text: paragraph.to_string(),
            tier: Tier::LastParagraph,
        };
    }

    Extraction {
        text: last_sentence(text),
        tier: Tier::LastSentence,
    }
}

/// AI回答から結果部分のみを抽出
///
/// # Examples
/// ```
/// use sheet_ai_common::{extract, ResultMarkers};
///
/// let reply = "途中の説明\n\n結果: 売上トップはA\n\n次のセクション";
/// assert_eq!(extract(reply, &ResultMarkers::default()), "売上トップはA");
/// ```
pub fn extract(text: &str, markers: &ResultMarkers) -> String {
    extract_with_tier(text, markers).text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> ResultMarkers {
        ResultMarkers::default()
    }

    // =============================================
    // マーカー段階
    // =============================================

    #[test]
    fn test_marker_line_until_blank() {
        let text = "途中の説明\n\n結果: 売上トップはA\n\n次のセクション";
        let extraction = extract_with_tier(text, &markers());
        assert_eq!(extraction.text, "売上トップはA");
        assert_eq!(extraction.tier, Tier::Marker);
    }

    #[test]
    fn test_marker_continuation_lines() {
        let text = "分析しました。\n結果: 東京が最大\n  売上 320\n大阪が次点\n\n補足";
        assert_eq!(extract(text, &markers()), "東京が最大\n売上 320\n大阪が次点");
    }

    #[test]
    fn test_marker_stops_at_heading() {
        let text = "Conclusion: A wins\n- by 20%\n# Appendix\nmore";
        assert_eq!(extract(text, &markers()), "A wins\n- by 20%");
    }

    #[test]
    fn test_marker_without_trailing_text_captures_following_lines() {
        let text = "前置き\n結論:\n東京がトップです\n\n以上";
        assert_eq!(extract(text, &markers()), "東京がトップです");
    }

    #[test]
    fn test_marker_order_breaks_ties() {
        // 行内の位置ではなくマーカー一覧の順で決まる
        let text = "まとめ: 前半 結果: 後半";
        assert_eq!(extract(text, &markers()), "後半");
    }

    #[test]
    fn test_only_first_capture_run_is_used() {
        let text = "結果: 一つ目\n\n結果: 二つ目";
        assert_eq!(extract(text, &markers()), "一つ目");
    }

    #[test]
    fn test_later_marker_lines_captured_verbatim() {
        let text = "結果:\n回答: そのまま\n続き";
        assert_eq!(extract(text, &markers()), "回答: そのまま\n続き");
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let text = "result: lower case\n\n最後の段落";
        assert_eq!(extract(text, &markers()), "最後の段落");
    }

    #[test]
    fn test_full_width_colon_is_not_marker() {
        let text = "結果： 全角コロン\n\n最後";
        assert_eq!(extract(text, &markers()), "最後");
    }

    #[test]
    fn test_crlf_lines() {
        let text = "説明\r\n結果: CRLFでも抽出\r\n\r\n後続";
        assert_eq!(extract(text, &markers()), "CRLFでも抽出");
    }

    #[test]
    fn test_empty_marker_capture_falls_back_to_paragraph() {
        let text = "段落1\n\n結果:\n\n段落3";
        let extraction = extract_with_tier(text, &markers());
        assert_eq!(extraction.text, "段落3");
        assert_eq!(extraction.tier, Tier::LastParagraph);
    }

    #[test]
    fn test_custom_markers() {
        let custom = ResultMarkers::new(["最終判定:"]);
        assert_eq!(extract("前文\n最終判定: 合格", &custom), "合格");
        assert_eq!(extract("結果: 無視される\n\n最後", &custom), "最後");
    }

    // =============================================
    // 段落・文の段階
    // =============================================

    #[test]
    fn test_last_paragraph_fallback() {
        let extraction = extract_with_tier("段落1\n\n段落2\n\n段落3", &markers());
        assert_eq!(extraction.text, "段落3");
        assert_eq!(extraction.tier, Tier::LastParagraph);
    }

    #[test]
    fn test_last_paragraph_is_trimmed() {
        assert_eq!(extract("A\n\n  B の内容  \n\n\n", &markers()), "B の内容");
    }

    #[test]
    fn test_single_sentence() {
        assert_eq!(extract("説明のみで終わる文章です。", &markers()), "説明のみで終わる文章です。");
    }

    #[test]
    fn test_last_sentence_helper() {
        assert_eq!(last_sentence("説明のみで終わる文章です。"), "説明のみで終わる文章です。");
        assert_eq!(last_sentence("一文目。二文目。"), "二文目。");
        assert_eq!(last_sentence("句点なし"), "句点なし");
    }

    #[test]
    fn test_empty_input_returned_unchanged() {
        let extraction = extract_with_tier("", &markers());
        assert_eq!(extraction.text, "");
        assert_eq!(extraction.tier, Tier::LastSentence);
    }

    #[test]
    fn test_whitespace_only_input_returned_unchanged() {
        assert_eq!(extract(" \n\n \n", &markers()), " \n\n \n");
    }

    #[test]
    fn test_result_markers_skip_empty_phrases() {
        let custom = ResultMarkers::new(["", "A:"]);
        assert_eq!(custom.as_slice(), &["A:".to_string()]);
    }
}
