use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::domain::catalog::{NewProduct, Product};
use crate::domain::group_order::{GroupOrderAggregate, GroupOrderEvent, OrderStatus};
use crate::event_sourcing::EventEnvelope;

// ============================================================================
// Wire Types - camelCase request/response shapes
// ============================================================================

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrderRequest {
    pub product_id: Uuid,
    pub target_qty: u32,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct JoinOrderRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ModifyOrderRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// `participant=me` restricts the listing to the caller's orders.
    pub participant: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: f64,
    pub category: String,
    pub unit: Option<String>,
    pub min_order_qty: u32,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price_per_kg: req.price_per_kg,
            category: req.category,
            unit: req.unit,
            min_order_qty: req.min_order_qty,
        }
    }
}

// ----------------------------------------------------------------------------
// Responses
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub vendor_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOrderView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub supplier_id: Uuid,
    pub price_per_kg: f64,
    pub unit: String,
    pub current_qty: u32,
    pub target_qty: u32,
    pub status: OrderStatus,
    pub participants: Vec<ParticipantView>,
    pub delivery_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<GroupOrderAggregate> for GroupOrderView {
    fn from(order: GroupOrderAggregate) -> Self {
        Self {
            id: order.id,
            product_id: order.product.product_id,
            product_name: order.product.name,
            supplier_id: order.product.supplier_id,
            price_per_kg: order.product.price_per_kg,
            unit: order.product.unit,
            current_qty: order.current_qty,
            target_qty: order.target_qty,
            status: order.status,
            participants: order
                .participants
                .into_iter()
                .map(|p| ParticipantView {
                    vendor_id: p.vendor_id,
                    quantity: p.quantity,
                })
                .collect(),
            delivery_date: order.delivery_date,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: f64,
    pub category: String,
    pub unit: String,
    pub min_order_qty: u32,
    pub supplier_id: Uuid,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price_per_kg: product.price_per_kg,
            category: product.category,
            unit: product.unit,
            min_order_qty: product.min_order_qty,
            supplier_id: product.supplier_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

/// Delivery-tracking timeline, replayed from the order's event history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub group_order_id: Uuid,
    pub status: OrderStatus,
    pub estimated_delivery: DateTime<Utc>,
    pub events: Vec<TrackingEvent>,
}

impl TrackingView {
    pub fn from_history(
        order: &GroupOrderAggregate,
        history: &[EventEnvelope<GroupOrderEvent>],
    ) -> Self {
        let events = history
            .iter()
            .filter_map(|envelope| {
                let status = match envelope.event_data {
                    GroupOrderEvent::Opened(_) => OrderStatus::Open,
                    GroupOrderEvent::Closed(_) => OrderStatus::Closed,
                    GroupOrderEvent::Delivered(_) => OrderStatus::Delivered,
                    GroupOrderEvent::Cancelled(_) => OrderStatus::Cancelled,
                    // Stake changes do not move the status
                    GroupOrderEvent::Joined(_) | GroupOrderEvent::Adjusted(_) => return None,
                };
                Some(TrackingEvent {
                    status,
                    timestamp: envelope.timestamp,
                })
            })
            .collect();

        Self {
            group_order_id: order.id,
            status: order.status,
            estimated_delivery: order.delivery_date,
            events,
        }
    }
}
