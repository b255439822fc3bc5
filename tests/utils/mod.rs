pub mod actions;
pub mod assertions;
pub mod season_builders;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::{fixture_body, ApiResponse};
#[allow(unused_imports)]
pub use assertions::{assert_table_invariants, TableAssertion};
#[allow(unused_imports)]
pub use season_builders::{Season, SeasonBuilder};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
