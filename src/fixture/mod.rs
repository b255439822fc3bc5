// Public API - what other modules can use
pub use handlers::{
    create_match, create_match_event, delete_match, delete_match_event, get_match,
    list_match_events, list_matches, update_match,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
