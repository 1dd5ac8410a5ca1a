use actix_web::{web, HttpRequest, HttpResponse};

use super::dto::{CreateProductRequest, ProductView};
use super::error::ApiError;
use super::identity::caller_identity;
use super::state::AppState;

// ============================================================================
// Product Handlers
// ============================================================================

pub async fn create_product(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, ApiError> {
    let supplier_id = caller_identity(&req)?;

    let product = state
        .catalog
        .insert(supplier_id, body.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(ProductView::from(product)))
}

pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let products: Vec<ProductView> = state
        .catalog
        .list()
        .await
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok(HttpResponse::Ok().json(products))
}
