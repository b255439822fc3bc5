// Public API - what other modules can use
pub use handlers::{
    create_group, create_league, delete_group, delete_league, get_group, get_league, list_groups,
    list_leagues, update_league,
};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
