//! Content Normalizer
//!
//! Turns any [`CodeBlockInput`] into a canonical `(code, language)` pair
//! ready for highlighting. Normalization never fails: every input yields a
//! usable block, and the language is always one the backend recognizes.

use serde::Serialize;
use serde_json::Value;

use super::highlight::{Highlighter, PLAINTEXT};
use super::input::CodeBlockInput;

const FENCE: &str = "```";

/// A code block ready for highlighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedBlock {
    pub code: String,
    /// A language the backend recognizes, or `"plaintext"`
    pub language: String,
}

/// Normalize a code block input.
///
/// `fallback_language` applies when the input carries no language of its
/// own. A language the backend does not recognize resolves to
/// `"plaintext"`.
pub fn normalize<H>(
    input: &CodeBlockInput,
    fallback_language: Option<&str>,
    backend: &H,
) -> NormalizedBlock
where
    H: Highlighter + ?Sized,
{
    let (code, language) = match input {
        CodeBlockInput::Plain(code) => (code.clone(), fallback_language),
        CodeBlockInput::Fenced { text, lang, .. } => {
            let language = lang
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .or(fallback_language);
            (strip_fences(text), language)
        }
        CodeBlockInput::Other(value) => (to_indented_json(value), fallback_language),
    };

    NormalizedBlock {
        code,
        language: resolve_language(language, backend),
    }
}

/// Remove leading fence lines and trailing fence markers, then trim.
///
/// The leading fence may carry a language tag (```` ```rust ````); it is
/// dropped with the rest of its line. Stripping repeats until neither end
/// starts or ends with a fence, so padded or doubled fences go too.
pub fn strip_fences(text: &str) -> String {
    let mut body = text.trim();
    loop {
        let before = body.len();
        if body.starts_with(FENCE) {
            body = match body.find('\n') {
                Some(newline) => &body[newline + 1..],
                None => "",
            };
        }
        let trimmed = body.trim_end();
        body = trimmed.strip_suffix(FENCE).unwrap_or(trimmed).trim();
        if body.len() == before {
            return body.to_string();
        }
    }
}

/// Two-space indented JSON with keys in the order they were read
fn to_indented_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize code block value");
        value.to_string()
    })
}

fn resolve_language<H>(language: Option<&str>, backend: &H) -> String
where
    H: Highlighter + ?Sized,
{
    match language.map(str::trim) {
        Some(language) if !language.is_empty() && backend.supports_language(language) => {
            language.to_string()
        }
        _ => PLAINTEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::highlight::{HighlightError, SyntectHighlighter};
    use serde_json::json;

    /// Backend that only knows a fixed list of languages
    struct KnownLanguages(&'static [&'static str]);

    impl Highlighter for KnownLanguages {
        fn supports_language(&self, language: &str) -> bool {
            self.0.contains(&language)
        }

        fn highlight(&self, code: &str, _language: &str) -> Result<String, HighlightError> {
            Ok(code.to_string())
        }
    }

    const BACKEND: KnownLanguages = KnownLanguages(&["js", "rust", PLAINTEXT]);

    #[test]
    fn test_plain_string_keeps_code() {
        for code in ["", "x", "  padded  ", "```js\nnot stripped\n```", "line1\nline2"] {
            let block = normalize(&CodeBlockInput::from(code), Some("rust"), &BACKEND);
            assert_eq!(block.code, code);
            assert_eq!(block.language, "rust");

            let block = normalize(&CodeBlockInput::from(code), None, &BACKEND);
            assert_eq!(block.code, code);
            assert_eq!(block.language, PLAINTEXT);
        }
    }

    #[test]
    fn test_fenced_block_end_to_end() {
        let input = CodeBlockInput::from_value(json!({
            "raw": "```js\nconsole.log(1)\n```",
            "text": "```js\nconsole.log(1)\n```",
            "lang": "js"
        }));
        let block = normalize(&input, None, &BACKEND);
        assert_eq!(
            block,
            NormalizedBlock {
                code: "console.log(1)".to_string(),
                language: "js".to_string()
            }
        );
    }

    #[test]
    fn test_fenced_block_without_fences_is_trimmed() {
        let input = CodeBlockInput::Fenced {
            raw: "```\n  let x = 1;  \n```".to_string(),
            text: "\n  let x = 1;  \n".to_string(),
            lang: None,
        };
        let block = normalize(&input, Some("rust"), &BACKEND);
        assert_eq!(block.code, "let x = 1;");
        assert_eq!(block.language, "rust");
    }

    #[test]
    fn test_fenced_code_has_no_markers_or_padding() {
        let texts = [
            "```js\nconsole.log(1)\n```",
            "```\nplain\n```\n\n",
            "```rust\n\n  fn main() {}\n\n```",
            "```",
            "```js",
            "body only\n```",
            "\n```js\nconsole.log(1)\n```",
            "  ```js\nx\n```",
            "```\n```\n```",
            "```js\n```py\nx\n```\n```",
        ];
        for text in texts {
            let input = CodeBlockInput::Fenced {
                raw: text.to_string(),
                text: text.to_string(),
                lang: None,
            };
            let block = normalize(&input, None, &BACKEND);
            assert!(!block.code.starts_with(FENCE), "{:?}", block.code);
            assert!(!block.code.ends_with(FENCE), "{:?}", block.code);
            assert_eq!(block.code, block.code.trim());
        }
    }

    #[test]
    fn test_structured_value_is_indented_json() {
        let input = CodeBlockInput::from_value(json!({"foo": 1}));
        let block = normalize(&input, None, &BACKEND);
        assert_eq!(block.code, "{\n  \"foo\": 1\n}");
        assert_eq!(block.language, PLAINTEXT);
    }

    #[test]
    fn test_structured_value_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
        let block = normalize(&CodeBlockInput::Other(value), None, &BACKEND);
        let zeta = block.code.find("zeta").unwrap();
        let alpha = block.code.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_unrecognized_language_is_plaintext() {
        for language in ["cobol-77", "", "   ", "JS"] {
            let block = normalize(&CodeBlockInput::from("x"), Some(language), &BACKEND);
            assert_eq!(block.language, PLAINTEXT, "language {:?}", language);
        }

        let input = CodeBlockInput::fenced("x", Some("cobol-77"));
        assert_eq!(normalize(&input, Some("js"), &BACKEND).language, PLAINTEXT);
    }

    #[test]
    fn test_block_lang_wins_over_fallback() {
        let input = CodeBlockInput::fenced("x", Some("js"));
        assert_eq!(normalize(&input, Some("rust"), &BACKEND).language, "js");
    }

    #[test]
    fn test_with_syntect_backend() {
        let backend = SyntectHighlighter::new();
        let block = normalize(&CodeBlockInput::from("print(1)"), Some("python"), &backend);
        assert_eq!(block.language, "python");

        let block = normalize(&CodeBlockInput::from("x"), Some("nope-lang"), &backend);
        assert_eq!(block.language, PLAINTEXT);
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```js\nconsole.log(1)\n```"), "console.log(1)");
        assert_eq!(strip_fences("```\n```"), "");
        assert_eq!(strip_fences("no fences"), "no fences");
        assert_eq!(strip_fences("```python extra words\nx = 1\n```  \n"), "x = 1");
        assert_eq!(strip_fences("\n```js\nconsole.log(1)\n```"), "console.log(1)");
        assert_eq!(strip_fences("  ```js\nx\n```"), "x");
        assert_eq!(strip_fences("```\n```\n```"), "");
        assert_eq!(strip_fences("```js\n```py\nx\n```\n```"), "x");
    }
}
