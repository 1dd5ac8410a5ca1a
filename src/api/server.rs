use actix_web::{web, App, HttpServer};

use super::group_orders;
use super::products;
use super::state::AppState;

// ============================================================================
// API Server
// ============================================================================

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/group-orders", web::post().to(group_orders::open_order))
        .route("/group-orders", web::get().to(group_orders::list_orders))
        .route("/group-orders/{id}", web::get().to(group_orders::get_order))
        .route("/group-orders/{id}/join", web::post().to(group_orders::join_order))
        .route("/group-orders/{id}/modify", web::put().to(group_orders::modify_order))
        .route("/group-orders/{id}/deliver", web::post().to(group_orders::deliver_order))
        .route("/group-orders/{id}/cancel", web::post().to(group_orders::cancel_order))
        .route("/group-orders/{id}/track", web::get().to(group_orders::track_order))
        .route("/products", web::post().to(products::create_product))
        .route("/products", web::get().to(products::list_products));
}

pub async fn start_api_server(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    tracing::info!("starting API server on http://{}:{}", host, port);

    let state = web::Data::new(state);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind((host, port))?
        .run()
        .await
}

// ============================================================================
// Handler Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::api::identity::IDENTITY_HEADER;
    use crate::domain::group_order::OrderPolicy;
    use crate::metrics::Metrics;
    use crate::utils::RetryConfig;

    fn state() -> AppState {
        AppState::new(
            OrderPolicy::default(),
            RetryConfig::default(),
            Arc::new(Metrics::new().unwrap()),
        )
    }

    async fn seed_product(state: &AppState) -> Uuid {
        let supplier_id = Uuid::new_v4();
        state
            .catalog
            .insert(
                supplier_id,
                crate::domain::catalog::NewProduct {
                    name: "Red Onions".to_string(),
                    description: None,
                    price_per_kg: 24.5,
                    category: "Vegetables".to_string(),
                    unit: None,
                    min_order_qty: 10,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[actix_web::test]
    async fn open_join_and_track_happy_path() {
        let state = state();
        let product_id = seed_product(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let initiator = Uuid::new_v4();
        let req = test::TestRequest::post()
            .uri("/group-orders")
            .insert_header((IDENTITY_HEADER, initiator.to_string()))
            .set_json(serde_json::json!({
                "productId": product_id,
                "targetQty": 100,
                "quantity": 20,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let order: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(order["currentQty"], 20);
        assert_eq!(order["status"], "open");
        assert_eq!(order["productName"], "Red Onions");
        let order_id = order["id"].as_str().unwrap().to_string();

        // A second vendor fills the order
        let req = test::TestRequest::post()
            .uri(&format!("/group-orders/{order_id}/join"))
            .insert_header((IDENTITY_HEADER, Uuid::new_v4().to_string()))
            .set_json(serde_json::json!({ "quantity": 80 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let order: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(order["currentQty"], 100);
        assert_eq!(order["status"], "closed");
        assert_eq!(order["participants"].as_array().unwrap().len(), 2);

        // Tracking timeline shows open then closed
        let req = test::TestRequest::get()
            .uri(&format!("/group-orders/{order_id}/track"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let tracking: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(tracking["status"], "closed");
        let events = tracking["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["status"], "open");
        assert_eq!(events[1]["status"], "closed");
    }

    #[actix_web::test]
    async fn error_mapping_matches_the_contract() {
        let state = state();
        let product_id = seed_product(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        // No identity header
        let req = test::TestRequest::post()
            .uri("/group-orders")
            .set_json(serde_json::json!({
                "productId": product_id,
                "targetQty": 100,
                "quantity": 20,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Unknown product
        let req = test::TestRequest::post()
            .uri("/group-orders")
            .insert_header((IDENTITY_HEADER, Uuid::new_v4().to_string()))
            .set_json(serde_json::json!({
                "productId": Uuid::new_v4(),
                "targetQty": 100,
                "quantity": 20,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "product_not_found");

        // Open a 100kg order with 90 already pooled
        let initiator = Uuid::new_v4();
        let req = test::TestRequest::post()
            .uri("/group-orders")
            .insert_header((IDENTITY_HEADER, initiator.to_string()))
            .set_json(serde_json::json!({
                "productId": product_id,
                "targetQty": 100,
                "quantity": 90,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let order: serde_json::Value = test::read_body_json(resp).await;
        let order_id = order["id"].as_str().unwrap().to_string();

        // Overshooting join is a conflict
        let req = test::TestRequest::post()
            .uri(&format!("/group-orders/{order_id}/join"))
            .insert_header((IDENTITY_HEADER, Uuid::new_v4().to_string()))
            .set_json(serde_json::json!({ "quantity": 11 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "capacity_exceeded");

        // Modify by a non-participant is forbidden
        let req = test::TestRequest::put()
            .uri(&format!("/group-orders/{order_id}/modify"))
            .insert_header((IDENTITY_HEADER, Uuid::new_v4().to_string()))
            .set_json(serde_json::json!({ "quantity": 5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Zero-quantity modify by the initiator is a bad request
        let req = test::TestRequest::put()
            .uri(&format!("/group-orders/{order_id}/modify"))
            .insert_header((IDENTITY_HEADER, initiator.to_string()))
            .set_json(serde_json::json!({ "quantity": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Unknown order
        let req = test::TestRequest::get()
            .uri(&format!("/group-orders/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn supplier_lifecycle_over_http() {
        let state = state();
        let product_id = seed_product(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        // Fill an order in one shot
        let req = test::TestRequest::post()
            .uri("/group-orders")
            .insert_header((IDENTITY_HEADER, Uuid::new_v4().to_string()))
            .set_json(serde_json::json!({
                "productId": product_id,
                "targetQty": 50,
                "quantity": 50,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let order: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(order["status"], "closed");
        let order_id = order["id"].as_str().unwrap().to_string();

        // Deliver it
        let req = test::TestRequest::post()
            .uri(&format!("/group-orders/{order_id}/deliver"))
            .insert_header((IDENTITY_HEADER, Uuid::new_v4().to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let order: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(order["status"], "delivered");

        // Cancelling a delivered order is rejected
        let req = test::TestRequest::post()
            .uri(&format!("/group-orders/{order_id}/cancel"))
            .insert_header((IDENTITY_HEADER, Uuid::new_v4().to_string()))
            .set_json(serde_json::json!({ "reason": "changed my mind" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn product_listing_round_trip() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let supplier = Uuid::new_v4();
        let req = test::TestRequest::post()
            .uri("/products")
            .insert_header((IDENTITY_HEADER, supplier.to_string()))
            .set_json(serde_json::json!({
                "name": "Tomatoes",
                "pricePerKg": 32.0,
                "category": "Vegetables",
                "minOrderQty": 5,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let product: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(product["unit"], "kg");
        assert_eq!(product["supplierId"], supplier.to_string());

        let req = test::TestRequest::get().uri("/products").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let products: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(products.as_array().unwrap().len(), 1);

        // Zero minimum order quantity is rejected
        let req = test::TestRequest::post()
            .uri("/products")
            .insert_header((IDENTITY_HEADER, supplier.to_string()))
            .set_json(serde_json::json!({
                "name": "Chillies",
                "pricePerKg": 80.0,
                "category": "Vegetables",
                "minOrderQty": 0,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn listing_filters_to_the_caller() {
        let state = state();
        let product_id = seed_product(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let vendor_a = Uuid::new_v4();
        let vendor_b = Uuid::new_v4();

        for vendor in [vendor_a, vendor_b] {
            let req = test::TestRequest::post()
                .uri("/group-orders")
                .insert_header((IDENTITY_HEADER, vendor.to_string()))
                .set_json(serde_json::json!({
                    "productId": product_id,
                    "targetQty": 100,
                    "quantity": 10,
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/group-orders?participant=me")
            .insert_header((IDENTITY_HEADER, vendor_a.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let mine: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(mine.as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/group-orders").to_request();
        let resp = test::call_service(&app, req).await;
        let all: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }
}
