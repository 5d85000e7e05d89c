//! Extraction of a JSON object from free-form LLM text
//!
//! LLMs asked to "return ONLY JSON" still wrap the object in markdown fences
//! or surround it with prose. This module isolates the cleanup: strip fence
//! markers, then take the greedy first-`{`-to-last-`}` span. Only one JSON
//! object is ever expected per reply, so the greedy span is sufficient.

use regex::Regex;
use std::sync::OnceLock;

fn object_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // (?s) so the span may cross newlines
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"))
}

/// Remove markdown code-fence markers without touching the fenced content
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Extract the first JSON object embedded in free text
///
/// Returns the raw object substring (fences stripped, prose discarded), or
/// `None` when the text contains no braced span.
pub fn extract_first_json_object(text: &str) -> Option<String> {
    let cleaned = strip_code_fences(text);
    object_span().find(&cleaned).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        let text = r#"{"intent": "chart"}"#;
        assert_eq!(extract_first_json_object(text).as_deref(), Some(text));
    }

    #[test]
    fn test_fenced_object() {
        let text = "```json\n{\"intent\": \"chart\"}\n```";
        assert_eq!(
            extract_first_json_object(text).as_deref(),
            Some(r#"{"intent": "chart"}"#)
        );
    }

    #[test]
    fn test_prose_around_object() {
        let text = "Sure! Here is the classification:\n{\"intent\": \"chart\"}\nLet me know.";
        assert_eq!(
            extract_first_json_object(text).as_deref(),
            Some(r#"{"intent": "chart"}"#)
        );
    }

    #[test]
    fn test_multiline_object() {
        let text = "{\n  \"intent\": \"chart\",\n  \"asset_symbol\": \"BTC\"\n}";
        let extracted = extract_first_json_object(text).expect("object present");
        let value: serde_json::Value = serde_json::from_str(&extracted).expect("valid json");
        assert_eq!(value["asset_symbol"], "BTC");
    }

    #[test]
    fn test_no_object() {
        assert_eq!(extract_first_json_object("I cannot classify that."), None);
        assert_eq!(extract_first_json_object(""), None);
    }

    #[test]
    fn test_greedy_span_covers_nested_braces() {
        // The greedy match reaches the last brace, so nested objects stay intact
        let text = r#"{"intent": "chart", "extra": {"period": "7d"}}"#;
        let extracted = extract_first_json_object(text).expect("object present");
        assert!(serde_json::from_str::<serde_json::Value>(&extracted).is_ok());
    }
}
