//! File Store Library
//!
//! Binary file storage keyed by filename: upload, retrieve, list and delete.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
/// Application state management
///
/// Process-wide handles injected into every request.
pub mod state;
pub mod store;
