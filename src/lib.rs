//! Business registry search API
//!
//! Compiles registry search requests into Solr queries and shapes the
//! responses for clients. The [`search`] module is the core; [`api`] exposes
//! it over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod search;

pub use error::{AppError, Result};
