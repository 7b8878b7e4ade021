// State management module
// Holds the explicitly constructed services handed to handlers

pub mod app_state;

pub use app_state::AppState;
