//! Markdown Component
//!
//! Renders markdown to highlighted HTML through the shared renderer.

use chatdesk::markdown::{render_markdown, MarkdownContent};
use leptos::*;

/// Rendered markdown
#[component]
pub fn Markdown(
    #[prop(into)]
    content: MaybeSignal<String>,
    #[prop(optional)]
    class: &'static str,
) -> impl IntoView {
    let html = move || render_markdown(&MarkdownContent::Text(content.get()));

    view! {
        <div class=format!("markdown-body {}", class) inner_html=html />
    }
}
