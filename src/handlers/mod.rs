//! HTTP request handlers for API endpoints.

pub mod error;
pub mod health;
pub mod home;
pub mod metrics;
pub mod openapi;
pub mod requests;
pub mod version;

pub use error::*;
pub use health::*;
pub use home::*;
pub use metrics::*;
pub use openapi::*;
pub use requests::*;
pub use version::*;
