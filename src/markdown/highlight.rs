//! Syntax highlighting backend
//!
//! The renderer only needs two things from a highlighter: whether it knows
//! a language, and a way to turn code into highlighted HTML. The default
//! backend is syntect with its bundled syntaxes, using the pure-Rust regex
//! engine so the same code runs in the browser.
//!
//! The bundled set has no TypeScript, Kotlin, Swift, TOML or Dockerfile
//! syntax. TypeScript and JSX tags are highlighted as JavaScript; the
//! others resolve to `plaintext`.

use std::sync::OnceLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Language identifier used when nothing better is known
pub const PLAINTEXT: &str = "plaintext";

/// Theme used for the generated stylesheet
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Spans are emitted as `hljs-<scope>` classes
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();

/// Errors raised by a highlighting backend
#[derive(Error, Debug)]
pub enum HighlightError {
    /// The backend failed while tokenizing the code
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// No syntax is registered for the language
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// No theme with that name is bundled
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Stylesheet generation failed
    #[error("CSS error: {0}")]
    Css(String),
}

/// A syntax highlighting backend
pub trait Highlighter {
    /// Whether `language` is recognized
    fn supports_language(&self, language: &str) -> bool;

    /// Highlight `code` as `language`, returning an HTML fragment
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError>;
}

impl<T: Highlighter + ?Sized> Highlighter for &T {
    fn supports_language(&self, language: &str) -> bool {
        (**self).supports_language(language)
    }

    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        (**self).highlight(code, language)
    }
}

/// syntect-backed highlighter
#[derive(Debug, Clone, Copy)]
pub struct SyntectHighlighter {
    syntaxes: &'static SyntaxSet,
}

impl SyntectHighlighter {
    /// Create a highlighter; the syntax set is loaded once per process
    pub fn new() -> Self {
        Self {
            syntaxes: SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines),
        }
    }

    fn find_syntax(&self, language: &str) -> Option<&'static SyntaxReference> {
        let token = language.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }
        if matches!(token.as_str(), PLAINTEXT | "text" | "txt" | "plain") {
            return Some(self.syntaxes.find_syntax_plain_text());
        }
        self.syntaxes.find_syntax_by_token(syntax_token_for(&token))
    }

    /// Stylesheet for the `hljs-` class style under the named theme
    pub fn theme_css(theme: &str) -> Result<String, HighlightError> {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(theme)
            .ok_or_else(|| HighlightError::UnknownTheme(theme.to_string()))?;
        css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| HighlightError::Css(e.to_string()))
    }

    /// Names of the bundled themes, sorted
    pub fn theme_names() -> Vec<String> {
        let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
        names.sort();
        names
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn supports_language(&self, language: &str) -> bool {
        self.find_syntax(language).is_some()
    }

    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError::Syntax(e.to_string()))?;
        }
        Ok(generator.finalize())
    }
}

/// Map common fence tags onto the tokens syntect registers
fn syntax_token_for(language: &str) -> &str {
    match language {
        "shell" | "sh" | "zsh" | "console" => "bash",
        "golang" => "go",
        "yml" => "yaml",
        "c++" => "cpp",
        "c#" | "csharp" => "cs",
        "py" | "python3" => "python",
        "rs" => "rust",
        "ts" | "typescript" | "tsx" | "jsx" | "mjs" | "cjs" => "js",
        "md" => "markdown",
        "htm" => "html",
        other => other,
    }
}
