//! # fbviz Data
//!
//! Data acquisition for fbviz.
//!
//! This crate provides:
//! - The [`DataSource`] trait over the statistics provider and its HTTP implementation
//! - A disk snapshot cache keyed by a content hash of the query, with TTL and invalidation
//! - [`DataLoader`], which routes every provider read through the cache and skips
//!   individual matches that fail inside per-match loops

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod loader;
pub mod source;

pub use cache::*;
pub use loader::*;
pub use source::*;
