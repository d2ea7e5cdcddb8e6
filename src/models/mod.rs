//! Data models for the weather requests API.
//!
//! `record` holds the persisted row and the shapes used to write it;
//! `api` holds the HTTP request and response bodies.

pub mod api;
pub mod record;

pub use api::*;
pub use record::*;
