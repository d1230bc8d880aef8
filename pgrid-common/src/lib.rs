//! # PGRID Common Library
//!
//! Shared code for the PGRID grid engine and catalog service:
//! - Identifier and filter condition types
//! - API request/response types
//! - Error types
//! - Configuration path helpers

pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{FilterCond, ItemId, TermId};
