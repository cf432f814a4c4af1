//! Session State
//!
//! - **storage**: Durable key-value storage trait and native backends
//! - **store**: The signed-in user, mirrored into durable storage
//!
//! # Lifecycle
//!
//! ```text
//! login → set_user_info → (memory + durable keys)
//! reload → restore(storage) → memory rebuilt from durable keys
//! logout / login page → clear_user_info → memory reset, keys erased
//! ```

pub mod storage;
pub mod store;

pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError, StorageResult};
pub use store::{LoginResponse, Role, Session, SessionStore, SESSION_KEYS};
