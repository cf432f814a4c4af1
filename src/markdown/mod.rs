//! Markdown Rendering Pipeline
//!
//! - **input**: Tagged rendering inputs, discriminated at the JSON boundary
//! - **normalize**: Canonical `(code, language)` pairs for code blocks
//! - **highlight**: Highlighting backend trait and the syntect backend
//! - **render**: Code block template and markdown-to-HTML rendering
//!
//! # Flow
//!
//! ```text
//! CodeBlockInput → normalize → NormalizedBlock → highlight → <pre><code class="hljs …">
//! MarkdownContent → markdown source → pulldown-cmark → (code blocks as above) → HTML
//! ```
//!
//! # Example
//!
//! ```rust
//! use chatdesk::markdown::{CodeBlockInput, Renderer};
//!
//! let renderer = Renderer::default();
//! let html = renderer.render_code(&CodeBlockInput::fenced("console.log(1)", Some("js")), None);
//! assert!(html.starts_with("<pre><code class=\"hljs language-js\">"));
//! ```

pub mod highlight;
pub mod input;
pub mod normalize;
pub mod render;

pub use highlight::{HighlightError, Highlighter, SyntectHighlighter, DEFAULT_THEME, PLAINTEXT};
pub use input::{CodeBlockInput, MarkdownContent};
pub use normalize::{normalize, strip_fences, NormalizedBlock};
pub use render::{render_code, render_markdown, RenderError, Renderer};
