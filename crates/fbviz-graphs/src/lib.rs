//! # fbviz Graphs
//!
//! Chart rendering for fbviz.
//!
//! This crate provides:
//! - Header layout: wrapping, justification and height estimation without font metrics
//! - Canvas composition with plotters, logo compositing with `image`, PNG output
//! - One [`ChartRenderer`] per chart type: points race, team form, rolling PSxG,
//!   tackling scatter, rate bars, on/off panels, pairing tables and the clean-win table

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bars;
pub mod canvas;
pub mod clean_wins;
pub mod color;
pub mod layout;
pub mod on_off;
pub mod output;
pub mod pairings;
pub mod points_race;
pub mod rolling_psxg;
pub mod table;
pub mod tackling;
pub mod team_form;
pub mod traits;
pub mod utils;

pub use bars::*;
pub use canvas::*;
pub use clean_wins::*;
pub use color::*;
pub use layout::*;
pub use on_off::*;
pub use output::*;
pub use pairings::*;
pub use points_race::*;
pub use rolling_psxg::*;
pub use table::*;
pub use tackling::*;
pub use team_form::*;
pub use traits::*;
