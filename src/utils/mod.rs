//! Utility functions and helper modules.

pub mod dates;
pub mod route;

pub use dates::*;
pub use route::*;
