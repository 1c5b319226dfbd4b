//! Static position evaluation

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, tally, Tally, FORCED_WIN};
pub use patterns::{PatternScore, Shape};
