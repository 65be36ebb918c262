//! Proxy module
//!
//! Handles request forwarding to the fixed upstream.

pub mod headers;
pub mod relay;
pub mod upstream;

pub use headers::UpstreamHeaderSet;
pub use relay::Relay;
pub use upstream::{UpstreamClient, UpstreamResponse};
