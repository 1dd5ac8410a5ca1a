use actix_web::HttpRequest;
use uuid::Uuid;

use super::error::ApiError;

// ============================================================================
// Caller Identity
// ============================================================================
//
// Authentication happens upstream; the authenticating proxy places the
// caller's id in this header. The service trusts it as given.
//
// ============================================================================

pub const IDENTITY_HEADER: &str = "x-vendor-id";

pub fn caller_identity(req: &HttpRequest) -> Result<Uuid, ApiError> {
    req.headers()
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or(ApiError::Identity)
}
