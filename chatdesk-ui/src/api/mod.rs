//! Chat API access from the browser

pub mod client;

pub use client::*;
