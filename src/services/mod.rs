//! Business logic and service layer modules.
//!
//! The weather fetcher and the record store sit behind traits so the create
//! flow and the handlers can run against any backend.

pub mod metrics;
pub mod postgrest;
pub mod requests;
pub mod store;
pub mod weather;

pub use metrics::*;
pub use postgrest::*;
pub use requests::*;
pub use store::*;
pub use weather::*;
