//! Pages
//!
//! Top-level page components for each route.

pub mod admin;
pub mod chat;
pub mod login;
pub mod placeholder;
pub mod purchase;

pub use admin::{AdminLayout, AdminSection};
pub use chat::Chat;
pub use login::Login;
pub use placeholder::Placeholder;
pub use purchase::Purchase;
