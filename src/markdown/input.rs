//! Rendering inputs
//!
//! Code blocks and markdown content arrive from the chat API in more than
//! one shape. They are discriminated once, at the JSON boundary, into the
//! tagged types below; everything downstream matches on the variant.

use serde_json::Value;

/// A code block as handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum CodeBlockInput {
    /// Bare code text
    Plain(String),
    /// A parsed fenced block: the original source, the inner text (which
    /// may still carry its fence lines) and the optional language tag
    Fenced {
        raw: String,
        text: String,
        lang: Option<String>,
    },
    /// Any other structured value; rendered as indented JSON
    Other(Value),
}

impl CodeBlockInput {
    /// Build a fenced block from its inner text, synthesizing `raw`.
    pub fn fenced(text: impl Into<String>, lang: Option<&str>) -> Self {
        let text = text.into();
        let raw = format!("```{}\n{}\n```", lang.unwrap_or(""), text);
        Self::Fenced {
            raw,
            text,
            lang: lang.map(str::to_string),
        }
    }

    /// Discriminate an untyped JSON value.
    ///
    /// Strings are plain code. Objects carrying non-empty `raw` and `text`
    /// strings are fenced blocks. Everything else is kept as-is.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Plain(s),
            Value::Object(ref map) => {
                let raw = non_empty_str(map.get("raw"));
                let text = non_empty_str(map.get("text"));
                match (raw, text) {
                    (Some(raw), Some(text)) => Self::Fenced {
                        raw: raw.to_string(),
                        text: text.to_string(),
                        lang: non_empty_str(map.get("lang")).map(str::to_string),
                    },
                    _ => Self::Other(value),
                }
            }
            other => Self::Other(other),
        }
    }

    /// Best-effort textual form, used when everything else has failed
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Plain(s) => s.clone(),
            Self::Fenced { text, .. } => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl From<String> for CodeBlockInput {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}

impl From<&str> for CodeBlockInput {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}

/// Content passed to the markdown entry point
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownContent {
    /// Markdown source text
    Text(String),
    /// A single code block to be wrapped in a fence and rendered
    Code { text: String, lang: Option<String> },
    /// Any other structured value; serialized to JSON before rendering
    Other(Value),
}

impl MarkdownContent {
    /// Discriminate an untyped JSON value.
    ///
    /// `null` is treated as empty text. Objects tagged `"type": "code"`
    /// with a non-empty `text` become code content.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Text(String::new()),
            Value::String(s) => Self::Text(s),
            Value::Object(ref map) => {
                let is_code = map.get("type").and_then(Value::as_str) == Some("code");
                match non_empty_str(map.get("text")) {
                    Some(text) if is_code => Self::Code {
                        text: text.to_string(),
                        lang: non_empty_str(map.get("lang")).map(str::to_string),
                    },
                    _ => Self::Other(value),
                }
            }
            other => Self::Other(other),
        }
    }

    /// True when there is nothing to render
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Best-effort textual form, returned when rendering fails
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Code { text, .. } => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl From<String> for MarkdownContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for MarkdownContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_is_plain() {
        let input = CodeBlockInput::from_value(json!("let x = 1;"));
        assert_eq!(input, CodeBlockInput::Plain("let x = 1;".to_string()));
    }

    #[test]
    fn test_raw_and_text_is_fenced() {
        let input = CodeBlockInput::from_value(json!({
            "raw": "```js\nconsole.log(1)\n```",
            "text": "console.log(1)",
            "lang": "js"
        }));
        match input {
            CodeBlockInput::Fenced { text, lang, .. } => {
                assert_eq!(text, "console.log(1)");
                assert_eq!(lang.as_deref(), Some("js"));
            }
            other => panic!("expected fenced block, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_lang_is_dropped() {
        let input = CodeBlockInput::from_value(json!({"raw": "x", "text": "x", "lang": ""}));
        assert!(matches!(input, CodeBlockInput::Fenced { lang: None, .. }));
    }

    #[test]
    fn test_missing_text_is_other() {
        let input = CodeBlockInput::from_value(json!({"raw": "```\nx\n```"}));
        assert!(matches!(input, CodeBlockInput::Other(_)));

        let input = CodeBlockInput::from_value(json!({"raw": "x", "text": ""}));
        assert!(matches!(input, CodeBlockInput::Other(_)));

        let input = CodeBlockInput::from_value(json!({"foo": 1}));
        assert_eq!(input, CodeBlockInput::Other(json!({"foo": 1})));
    }

    #[test]
    fn test_fenced_constructor() {
        let input = CodeBlockInput::fenced("fn main() {}", Some("rust"));
        match input {
            CodeBlockInput::Fenced { raw, .. } => assert_eq!(raw, "```rust\nfn main() {}\n```"),
            other => panic!("expected fenced block, got {:?}", other),
        }
    }

    #[test]
    fn test_markdown_content_shapes() {
        assert_eq!(MarkdownContent::from_value(json!(null)), MarkdownContent::Text(String::new()));
        assert_eq!(
            MarkdownContent::from_value(json!("# Title")),
            MarkdownContent::Text("# Title".to_string())
        );
        assert_eq!(
            MarkdownContent::from_value(json!({"type": "code", "text": "ls", "lang": "bash"})),
            MarkdownContent::Code {
                text: "ls".to_string(),
                lang: Some("bash".to_string())
            }
        );
        // Untagged or empty code objects are not treated as code
        assert!(matches!(
            MarkdownContent::from_value(json!({"text": "ls"})),
            MarkdownContent::Other(_)
        ));
        assert!(matches!(
            MarkdownContent::from_value(json!({"type": "code", "text": ""})),
            MarkdownContent::Other(_)
        ));
    }

    #[test]
    fn test_is_empty() {
        assert!(MarkdownContent::from("").is_empty());
        assert!(!MarkdownContent::from("a").is_empty());
        assert!(!MarkdownContent::Other(json!({})).is_empty());
    }
}
