// Public API - what other modules can use
pub use handlers::{create_team, delete_team, get_team, list_teams, update_team};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
