//! Response sanitization
//!
//! Structured output mode is asked for, but models still occasionally wrap
//! the JSON in Markdown fences or leave a trailing comma before a closing
//! brace. Both are stripped before parsing. Sanitization is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing comma before a closing `}` or `]`
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("trailing-comma pattern is valid"));

/// Strip Markdown code-fence markers and trailing commas from a model
/// response, leaving text ready for the JSON parser.
pub fn sanitize_model_json(text: &str) -> String {
    let stripped = text.replace("```json", "").replace("```", "");
    TRAILING_COMMA
        .replace_all(stripped.trim(), "$1")
        .into_owned()
}

/// Strip a `data:<mime>;base64,` prefix from an externally supplied
/// encoding. Bytes encoded by this crate never carry one; upload surfaces
/// that hand over `FileReader`-style data URLs do.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    match encoded.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_json_fences() {
        let fenced = "```json\n{\"currency\": \"USD\"}\n```";
        assert_eq!(sanitize_model_json(fenced), "{\"currency\": \"USD\"}");
    }

    #[test]
    fn test_strips_bare_fences() {
        let fenced = "```\n{\"currency\": \"USD\"}\n```";
        assert_eq!(sanitize_model_json(fenced), "{\"currency\": \"USD\"}");
    }

    #[test]
    fn test_strips_trailing_commas() {
        let input = "{\"a\": 1, \"b\": [1, 2,],}";
        assert_eq!(sanitize_model_json(input), "{\"a\": 1, \"b\": [1, 2]}");
    }

    #[test]
    fn test_clean_input_unchanged() {
        let clean = "{\"a\": 1, \"b\": [1, 2]}";
        assert_eq!(sanitize_model_json(clean), clean);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = "```json\n{\"a\": 1,\n \"b\": [1, 2,],\n}\n```";
        let once = sanitize_model_json(input);
        let twice = sanitize_model_json(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strips_data_url_prefix() {
        assert_eq!(
            strip_data_url_prefix("data:application/pdf;base64,JVBERi0x"),
            "JVBERi0x"
        );
    }

    #[test]
    fn test_plain_base64_untouched() {
        // Base64 never contains a comma, but an arbitrary string might;
        // only a data: prefix triggers stripping
        assert_eq!(strip_data_url_prefix("JVBERi0x"), "JVBERi0x");
        assert_eq!(strip_data_url_prefix("abc,def"), "abc,def");
    }
}
