//! Ordering core tests
//!
//! All tests run against an in-memory SurrealDB through the same
//! services the HTTP handlers use.

mod test_checkout;
mod test_lifecycle;

use crate::core::{Config, ServerState};
use crate::db::DbService;
use crate::db::repository::ProductRepository;
use crate::db::models::ProductCreate;
use crate::orders::{CheckoutRequest, DeliveryLocationInput};
use shared::message::BusEvent;
use shared::order::{PaymentMethod, PurchaseType};
use std::time::Duration;
use tokio::sync::broadcast;

fn test_config() -> Config {
    Config {
        work_dir: ".".to_string(),
        http_port: 0,
        environment: "test".to_string(),
        bus_channel_capacity: 64,
    }
}

async fn test_state() -> ServerState {
    let db = DbService::new_in_memory().await.unwrap();
    ServerState::with_db(test_config(), db.db)
}

/// Seed a catalog product, returning its record id ("product:...")
async fn seed_product(state: &ServerState, name: &str, price: f64) -> String {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .create(ProductCreate {
            name: name.to_string(),
            price,
            image: None,
            stock: Some(100),
        })
        .await
        .unwrap();
    product.id_string()
}

fn dine_in_request(payment: PaymentMethod) -> CheckoutRequest {
    CheckoutRequest {
        payment_method: payment,
        purchase_type: PurchaseType::DineIn,
        delivery_location: None,
        manual_address: None,
    }
}

fn delivery_request(coordinates: Vec<f64>) -> CheckoutRequest {
    CheckoutRequest {
        payment_method: PaymentMethod::CashOnDelivery,
        purchase_type: PurchaseType::Delivery,
        delivery_location: Some(DeliveryLocationInput { coordinates }),
        manual_address: Some("123 Roast St".to_string()),
    }
}

/// Receive the next event or fail fast
async fn recv_event(rx: &mut broadcast::Receiver<BusEvent>) -> BusEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("notifier channel closed")
}

/// Seed one product, fill a cart and check it out as Dine-In / Cash.
/// Returns the persisted order.
async fn place_order(state: &ServerState, user_id: &str) -> crate::db::models::Order {
    let product_id = seed_product(state, "Latte", 5.5).await;
    state.cart.add_item(user_id, &product_id, 2).await.unwrap();
    state
        .checkout
        .checkout(user_id, dine_in_request(PaymentMethod::Cash))
        .await
        .unwrap()
}
