//! UI Components
//!
//! Reusable Leptos components.

pub mod markdown;
pub mod nav;
pub mod toast;

pub use markdown::Markdown;
pub use nav::Nav;
pub use toast::Toast;
