//! # fbviz Common
//!
//! Shared types, errors, logging and table-shaping helpers for fbviz.
//!
//! This crate provides the foundational types used across every other crate
//! in the workspace: the match and stat row model delivered by the data
//! provider, the workspace error type, and the small reshaping utilities
//! (score parsing, column flattening, team-perspective normalization).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use logging::*;
pub use types::*;
pub use utils::*;
