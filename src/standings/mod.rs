// Public API - what other modules can use
pub use handlers::{get_group_scorers, get_group_standings};

pub mod engine;
pub mod form;
pub mod ordering;
pub mod scorers;
pub mod service;

mod errors;
mod handlers;
pub mod models;

pub use engine::{compute_table, summarize};
pub use errors::StandingsError;
pub use models::*;
pub use scorers::compute_top_scorers;
pub use service::StandingsService;

/// Number of most recent results kept in a row's form
pub const FORM_WINDOW: usize = 5;

/// League points awarded per result. A loss is worth nothing.
pub mod scoring {
    pub const WIN: u32 = 3;
    pub const DRAW: u32 = 1;

    pub fn points(won: u32, drawn: u32) -> u32 {
        WIN * won + DRAW * drawn
    }
}
