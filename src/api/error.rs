use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use crate::domain::catalog::CatalogError;
use crate::domain::group_order::GroupOrderError;

// ============================================================================
// API Errors - domain error -> HTTP status translation
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing or malformed X-Vendor-Id header")]
    Identity,

    #[error(transparent)]
    Order(#[from] GroupOrderError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    /// Stable machine-readable error kind for the response body.
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Identity => "unauthorized",
            ApiError::Order(err) => match err {
                GroupOrderError::InvalidQuantity(_) => "invalid_quantity",
                GroupOrderError::ProductNotFound(_) => "product_not_found",
                GroupOrderError::OrderNotFound(_) => "order_not_found",
                GroupOrderError::OrderNotOpen(_) => "order_not_open",
                GroupOrderError::OrderNotClosed(_) => "order_not_closed",
                GroupOrderError::AlreadyTerminal(_) => "order_finished",
                GroupOrderError::CapacityExceeded { .. } => "capacity_exceeded",
                GroupOrderError::NotAParticipant(_) => "not_a_participant",
                GroupOrderError::Conflict(_) => "conflict",
                GroupOrderError::NotInitialized | GroupOrderError::Store(_) => "internal",
            },
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound(_) => "product_not_found",
                CatalogError::Invalid(_) => "invalid_product",
            },
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Identity => StatusCode::UNAUTHORIZED,
            ApiError::Order(err) => match err {
                GroupOrderError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
                GroupOrderError::ProductNotFound(_) | GroupOrderError::OrderNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                GroupOrderError::NotAParticipant(_) => StatusCode::FORBIDDEN,
                GroupOrderError::OrderNotOpen(_)
                | GroupOrderError::OrderNotClosed(_)
                | GroupOrderError::AlreadyTerminal(_)
                | GroupOrderError::CapacityExceeded { .. } => StatusCode::CONFLICT,
                GroupOrderError::Conflict(_) => StatusCode::SERVICE_UNAVAILABLE,
                GroupOrderError::NotInitialized | GroupOrderError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Invalid(_) => StatusCode::BAD_REQUEST,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
