//! Constraint counts, constrained prime search and the `zkiot` command line.

pub mod cli;
pub mod counts;
pub mod error;
pub mod listing;
pub mod math;
pub mod record;
pub mod search;

pub use cli::Cli;
pub use counts::ConstraintCounts;
pub use error::SetupError;
pub use listing::{evaluate_listing, read_listing};
pub use record::SetupRecord;
pub use search::{find_prime_and_generator, PrimeGenerator, PrimeSearch, SearchDirection};
