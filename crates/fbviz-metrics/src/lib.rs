//! # fbviz Metrics
//!
//! Derived metrics computed from provider rows.
//!
//! Every function here is pure: rows in, derived rows out. Nothing fetches,
//! caches or draws. Pipelines in the binary combine these with the data
//! loader and the renderers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod clean_wins;
pub mod form;
pub mod goalkeeping;
pub mod pairing;
pub mod players;
pub mod rates;
pub mod stats;
pub mod strength;
pub mod xpts;

pub use clean_wins::*;
pub use form::*;
pub use goalkeeping::*;
pub use pairing::*;
pub use players::*;
pub use rates::*;
pub use stats::*;
pub use strength::*;
pub use xpts::*;
