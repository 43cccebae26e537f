//! API middleware components

pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use rate_limit::{rate_limit_middleware, RATE_LIMIT_MESSAGE};
pub use security::{request_guard_middleware, security_headers_middleware};
