//! Markdown and code block rendering
//!
//! Code blocks go through normalize → highlight → HTML template. Markdown
//! documents are parsed with pulldown-cmark, and every code block inside
//! them takes the same path. Neither entry point ever fails: rendering
//! errors are logged and degrade to a plainer output.

use std::borrow::Cow;
use std::sync::OnceLock;

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use thiserror::Error;

use super::highlight::{Highlighter, SyntectHighlighter};
use super::input::{CodeBlockInput, MarkdownContent};
use super::normalize::{normalize, NormalizedBlock};
use crate::config::RenderConfig;

static DEFAULT_RENDERER: OnceLock<Renderer> = OnceLock::new();

/// Errors raised while producing markdown source
#[derive(Error, Debug)]
pub enum RenderError {
    /// A structured value could not be turned into text
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Markdown renderer with syntax-highlighted code blocks
#[derive(Debug, Clone)]
pub struct Renderer<H = SyntectHighlighter> {
    highlighter: H,
    config: RenderConfig,
}

impl Renderer<SyntectHighlighter> {
    /// Renderer backed by syntect
    pub fn new(config: RenderConfig) -> Self {
        Self::with_highlighter(SyntectHighlighter::new(), config)
    }
}

impl Default for Renderer<SyntectHighlighter> {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl<H: Highlighter> Renderer<H> {
    /// Renderer backed by a custom highlighter
    pub fn with_highlighter(highlighter: H, config: RenderConfig) -> Self {
        Self {
            highlighter,
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Normalize a code block with this renderer's backend and fallback
    pub fn normalize(&self, input: &CodeBlockInput, fallback: Option<&str>) -> NormalizedBlock {
        let fallback = fallback.or(self.config.fallback_language.as_deref());
        normalize(input, fallback, &self.highlighter)
    }

    /// Render one code block to `<pre><code class="hljs language-…">`.
    ///
    /// When highlighting fails the code is placed in the same template
    /// unhighlighted and unescaped.
    pub fn render_code(&self, input: &CodeBlockInput, fallback: Option<&str>) -> String {
        let block = self.normalize(input, fallback);

        match self.highlighter.highlight(&block.code, &block.language) {
            Ok(highlighted) => code_template(&block.language, &highlighted),
            Err(e) => {
                tracing::error!(
                    language = %block.language,
                    error = %e,
                    "Highlight error"
                );
                code_template(&block.language, &block.code)
            }
        }
    }

    /// Render markdown content to HTML.
    ///
    /// On failure the error is logged and the content's plain string form
    /// is returned instead.
    pub fn render_markdown(&self, content: &MarkdownContent) -> String {
        or_plain(self.try_render_markdown(content), content)
    }

    /// Render markdown content, surfacing errors to the caller
    pub fn try_render_markdown(&self, content: &MarkdownContent) -> Result<String, RenderError> {
        let source: Cow<'_, str> = match content {
            MarkdownContent::Text(text) if text.is_empty() => return Ok(String::new()),
            MarkdownContent::Text(text) => Cow::Borrowed(text.as_str()),
            MarkdownContent::Code { text, lang } => Cow::Owned(format!(
                "```{}\n{}\n```",
                lang.as_deref().unwrap_or(""),
                text
            )),
            MarkdownContent::Other(value) => Cow::Owned(serde_json::to_string_pretty(value)?),
        };

        Ok(self.markdown_to_html(&source))
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.config.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }

    fn markdown_to_html(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, self.parser_options());

        // (info-string language, collected text) of the open code block
        let mut open_block: Option<(Option<String>, String)> = None;
        let mut events = Vec::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    open_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, text)) = open_block.take() {
                        let code = text.strip_suffix('\n').unwrap_or(&text);
                        let rendered =
                            self.render_code(&CodeBlockInput::from(code), lang.as_deref());
                        events.push(Event::Html(format!("{}\n", rendered).into()));
                    }
                }
                Event::Text(text) if open_block.is_some() => {
                    if let Some((_, buffer)) = open_block.as_mut() {
                        buffer.push_str(&text);
                    }
                }
                Event::SoftBreak if self.config.breaks => events.push(Event::HardBreak),
                other => events.push(other),
            }
        }

        let mut output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }
}

/// Rendered HTML, or the content's plain string form after logging the error
fn or_plain(result: Result<String, RenderError>, content: &MarkdownContent) -> String {
    match result {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(error = %e, "Markdown parsing error");
            content.to_plain_string()
        }
    }
}

fn code_template(language: &str, body: &str) -> String {
    format!(
        "<pre><code class=\"hljs language-{}\">{}</code></pre>",
        language, body
    )
}

fn default_renderer() -> &'static Renderer {
    DEFAULT_RENDERER.get_or_init(Renderer::default)
}

/// Render a code block with the process-wide default renderer
pub fn render_code(input: &CodeBlockInput) -> String {
    default_renderer().render_code(input, None)
}

/// Render markdown content with the process-wide default renderer
pub fn render_markdown(content: &MarkdownContent) -> String {
    default_renderer().render_markdown(content)
}
