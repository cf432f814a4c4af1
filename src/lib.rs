//! # Chat Desk
//!
//! Client core of the Chat Desk web front end: markdown rendering with
//! syntax highlighting, the navigation guard, and session and settings
//! state. The same crate backs the Leptos front end (`chatdesk-ui`) and the
//! `chatdesk` command-line client.
//!
//! ## Modules
//!
//! - [`markdown`]: Code block normalization, highlighting and markdown rendering
//! - [`router`]: Route table and path matching
//! - [`guard`]: Authentication and authorization gate for navigation
//! - [`session`]: Signed-in user mirrored into durable storage
//! - [`settings`]: Site settings fetched at startup
//! - [`http`]: Request outcome handling shared by the API clients
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use chatdesk::config::RouterConfig;
//! use chatdesk::guard::{Navigation, NavigationGuard};
//! use chatdesk::router::RouteTable;
//! use chatdesk::session::{MemoryStorage, SessionStore};
//!
//! let routes = RouteTable::standard();
//! let config = RouterConfig::default();
//! let guard = NavigationGuard::new(&routes, &config);
//!
//! let mut session = SessionStore::restore(MemoryStorage::new());
//! assert_eq!(
//!     guard.before_each("/chat", &mut session),
//!     Navigation::redirect("/login")
//! );
//! ```

pub mod config;
pub mod guard;
pub mod http;
pub mod markdown;
pub mod router;
pub mod session;
pub mod settings;

#[cfg(not(target_arch = "wasm32"))]
pub mod client;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

// Re-export top-level types for convenience
pub use markdown::{
    normalize, render_code, render_markdown, CodeBlockInput, HighlightError, Highlighter,
    MarkdownContent, NormalizedBlock, RenderError, Renderer, SyntectHighlighter,
};

pub use router::{RouteMeta, RouteRecord, RouteTable};

pub use guard::{Navigation, NavigationGuard};

pub use session::{
    DurableStorage, FileStorage, LoginResponse, MemoryStorage, Role, Session, SessionStore,
    StorageError, StorageResult,
};

pub use settings::{FrontendSettings, SettingsStore};

pub use http::{HttpFailure, Navigator, RecordingNavigator, RequestError, UserProfile};

pub use config::{
    ApiConfig, AuthenticatedEntryPolicy, Config, ConfigError, LoggingConfig, RenderConfig,
    RouterConfig, SessionConfig,
};

#[cfg(not(target_arch = "wasm32"))]
pub use client::ApiClient;
