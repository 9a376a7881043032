//! # fbviz CLI
//!
//! Command-line front end for fbviz.
//!
//! Each subcommand is one pipeline: load provider data through the snapshot
//! cache, derive a metric, render a chart under the output directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod args;
pub mod commands;
pub mod error;

pub use app::*;
pub use args::*;
pub use error::*;
