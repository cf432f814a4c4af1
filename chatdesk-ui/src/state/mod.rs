//! State Management
//!
//! Global application state and browser-backed session storage.

pub mod global;
pub mod storage;

pub use global::{provide_global_state, GlobalState};
pub use storage::shared_storage;
