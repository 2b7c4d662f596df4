//! API layer - HTTP entry points.

pub mod caller;
pub mod http;

pub use caller::Caller;
pub use http::{router, routes, ApiError};
