//! # fbviz Config
//!
//! Type-safe configuration management for fbviz.
//!
//! This crate provides the configuration schema, its defaults, YAML loading
//! with environment overrides, and validation. Plot styling lives here as a
//! plain value that callers pass to renderers explicitly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;
