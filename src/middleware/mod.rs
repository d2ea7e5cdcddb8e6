//! Custom middleware implementations for the API.

pub mod metrics;
pub mod request_id;

pub use metrics::*;
pub use request_id::*;
