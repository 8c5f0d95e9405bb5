// State management module
// Process-wide handles shared by every request

pub mod app_state;

pub use app_state::{AppState, SharedState};
