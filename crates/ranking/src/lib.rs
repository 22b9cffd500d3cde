//! Ranking engine for ClosetSwap
//!
//! Orders listings for a viewer. Ranking is read-only: it reorders what it
//! is handed and never consults or mutates the catalog.
//!
//! # Modules
//!
//! - [`mode`] - Sort modes
//! - [`score`] - The `recommended` composite score
//! - [`engine`] - The `rank` entry point
//! - [`filter`] - Browse filter bar (category, condition, price range)

pub mod engine;
pub mod filter;
pub mod mode;
pub mod score;

pub use engine::rank;
pub use filter::BrowseFilter;
pub use mode::SortMode;
pub use score::{recommended_score, RankingContext, ScoreBreakdown};
