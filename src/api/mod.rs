// ============================================================================
// API Layer - HTTP boundary
// ============================================================================
//
// actix-web REST surface over the group-order command handler and the
// catalog. Authentication lives upstream; this layer only extracts the
// authenticated caller id from the X-Vendor-Id header and translates
// domain errors into status codes.
//
// ============================================================================

pub mod dto;
pub mod error;
pub mod group_orders;
pub mod identity;
pub mod products;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{routes, start_api_server};
pub use state::AppState;
