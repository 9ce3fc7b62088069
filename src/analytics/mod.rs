//! Historical analytics over the city archives.
//!
//! Four operations, each a pure function over borrowed rows: trend
//! aggregation, forecasting, pattern analysis and risk assessment. All of
//! them treat "no qualifying data" as a message-carrying result rather than
//! an error, and exclude unparseable values from every statistic.

pub mod stats;

mod forecast;
mod patterns;
mod risk;
mod trends;

pub use forecast::*;
pub use patterns::*;
pub use risk::*;
pub use trends::*;
