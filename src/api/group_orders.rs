use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::domain::group_order::GroupOrderCommand;

use super::dto::{
    CancelOrderRequest, GroupOrderView, JoinOrderRequest, ListOrdersQuery, ModifyOrderRequest,
    OpenOrderRequest, TrackingView,
};
use super::error::ApiError;
use super::identity::caller_identity;
use super::state::AppState;

// ============================================================================
// Group Order Handlers
// ============================================================================

pub async fn open_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<OpenOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let vendor_id = caller_identity(&req)?;
    let body = body.into_inner();

    let order = state
        .orders
        .open(vendor_id, body.product_id, body.target_qty, body.quantity)
        .await?;

    Ok(HttpResponse::Created().json(GroupOrderView::from(order)))
}

pub async fn join_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<JoinOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let vendor_id = caller_identity(&req)?;

    let order = state
        .orders
        .execute(
            path.into_inner(),
            GroupOrderCommand::Join {
                vendor_id,
                quantity: body.quantity,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(GroupOrderView::from(order)))
}

pub async fn modify_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ModifyOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let vendor_id = caller_identity(&req)?;

    let order = state
        .orders
        .execute(
            path.into_inner(),
            GroupOrderCommand::Adjust {
                vendor_id,
                new_quantity: body.quantity,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(GroupOrderView::from(order)))
}

pub async fn deliver_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller_identity(&req)?;

    let order = state
        .orders
        .execute(path.into_inner(), GroupOrderCommand::Deliver)
        .await?;

    Ok(HttpResponse::Ok().json(GroupOrderView::from(order)))
}

pub async fn cancel_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: Option<web::Json<CancelOrderRequest>>,
) -> Result<HttpResponse, ApiError> {
    let caller = caller_identity(&req)?;

    let order = state
        .orders
        .execute(
            path.into_inner(),
            GroupOrderCommand::Cancel {
                reason: body.and_then(|b| b.into_inner().reason),
                cancelled_by: Some(caller),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(GroupOrderView::from(order)))
}

pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let order = state.orders.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GroupOrderView::from(order)))
}

pub async fn list_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, ApiError> {
    let orders = match query.participant.as_deref() {
        Some("me") => {
            let vendor_id = caller_identity(&req)?;
            state.orders.list_for(vendor_id).await?
        }
        _ => state.orders.list().await?,
    };

    let views: Vec<GroupOrderView> = orders.into_iter().map(GroupOrderView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

pub async fn track_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let order_id = path.into_inner();

    let order = state.orders.get(order_id).await?;
    let history = state.orders.history(order_id).await?;

    Ok(HttpResponse::Ok().json(TrackingView::from_history(&order, &history)))
}
