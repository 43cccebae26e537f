//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod support;
pub mod types;

pub use router::{cors_layer, create_router_with_state};
pub use state::AppState;
