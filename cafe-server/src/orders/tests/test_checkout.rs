//! Checkout orchestration tests

use super::*;
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::orders::OrderError;
use shared::order::{OrderStatus, PaymentStatus};

#[tokio::test]
async fn dine_in_checkout_snapshots_the_cart() {
    let state = test_state().await;
    let cappuccino = seed_product(&state, "Cappuccino", 50.0).await;
    let muffin = seed_product(&state, "Muffin", 25.0).await;
    state.cart.add_item("user_a", &cappuccino, 1).await.unwrap();
    state.cart.add_item("user_a", &muffin, 2).await.unwrap();

    let order = state
        .checkout
        .checkout("user_a", dine_in_request(PaymentMethod::Cash))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.purchase_type, PurchaseType::DineIn);
    assert!(order.delivery_location.is_none());
    assert_eq!(order.items.len(), 2);
    assert!((order.total - 100.0).abs() < f64::EPSILON);

    // The cart is closed, not deleted
    assert!(state.cart.get_active_cart("user_a").await.unwrap().is_none());
    assert_eq!(state.cart.list_history("user_a").await.unwrap().len(), 1);
}

#[tokio::test]
async fn ewallet_payment_is_marked_paid_upfront() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 1).await.unwrap();

    let order = state
        .checkout
        .checkout("user_a", dine_in_request(PaymentMethod::EWallet))
        .await
        .unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn delivery_persists_coordinates_verbatim() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 1).await.unwrap();

    let order = state
        .checkout
        .checkout("user_a", delivery_request(vec![121.0, 14.6]))
        .await
        .unwrap();

    // Re-read from the store instead of trusting the returned struct
    let persisted = OrderRepository::new(state.db.clone())
        .find_by_id(&order.id_string())
        .await
        .unwrap()
        .unwrap();
    let location = persisted.delivery_location.unwrap();
    assert_eq!(location.kind, "Point");
    assert_eq!(location.coordinates, [121.0, 14.6]);
    assert_eq!(persisted.manual_address.as_deref(), Some("123 Roast St"));
}

#[tokio::test]
async fn delivery_rejects_missing_or_malformed_location() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 1).await.unwrap();

    let mut request = delivery_request(vec![]);
    request.delivery_location = None;
    let err = state.checkout.checkout("user_a", request).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidLocation(_)));

    for bad in [vec![], vec![121.0], vec![121.0, 14.6, 3.0], vec![f64::NAN, 14.6]] {
        let err = state
            .checkout
            .checkout("user_a", delivery_request(bad))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidLocation(_)));
    }

    // Validation happens before the claim: the cart is still active
    assert!(state.cart.get_active_cart("user_a").await.unwrap().is_some());
}

#[tokio::test]
async fn dine_in_discards_a_supplied_location() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 1).await.unwrap();

    let request = CheckoutRequest {
        payment_method: PaymentMethod::Cash,
        purchase_type: PurchaseType::DineIn,
        delivery_location: Some(DeliveryLocationInput {
            coordinates: vec![121.0, 14.6],
        }),
        manual_address: None,
    };
    let order = state.checkout.checkout("user_a", request).await.unwrap();
    assert!(order.delivery_location.is_none());
}

#[tokio::test]
async fn checkout_without_cart_or_with_empty_cart_fails() {
    let state = test_state().await;

    let err = state
        .checkout
        .checkout("user_a", dine_in_request(PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));

    // An active cart whose last item was removed is treated the same,
    // and the claim is rolled back
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 1).await.unwrap();
    state.cart.remove_item("user_a", &product_id).await.unwrap();

    let err = state
        .checkout
        .checkout("user_a", dine_in_request(PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));
    assert!(state.cart.get_active_cart("user_a").await.unwrap().is_some());
}

#[tokio::test]
async fn concurrent_checkouts_produce_exactly_one_order() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 3).await.unwrap();

    let (first, second) = tokio::join!(
        state
            .checkout
            .checkout("user_a", dine_in_request(PaymentMethod::Cash)),
        state
            .checkout
            .checkout("user_a", dine_in_request(PaymentMethod::Cash)),
    );

    let outcomes = [first, second];
    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(
        outcomes
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(OrderError::EmptyCart)))
    );

    let orders = OrderRepository::new(state.db.clone())
        .find_by_user("user_a")
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items[0].quantity, 3);
}

#[tokio::test]
async fn aborted_checkout_compensation_keeps_one_active_cart() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;

    for _ in 0..5 {
        // Leave an empty active cart so checkout claims it and has to
        // roll the claim back
        state.cart.add_item("user_a", &product_id, 1).await.unwrap();
        state.cart.remove_item("user_a", &product_id).await.unwrap();

        // Race the rollback against a cart write. The shared per-user
        // lock serializes them: add_item either lands before the claim
        // (checkout then succeeds) or after the reactivation (same cart
        // reused) - it can never create a second active cart.
        let (checkout_res, add_res) = tokio::join!(
            state
                .checkout
                .checkout("user_a", dine_in_request(PaymentMethod::Cash)),
            state.cart.add_item("user_a", &product_id, 1),
        );
        add_res.unwrap();
        assert!(matches!(checkout_res, Ok(_) | Err(OrderError::EmptyCart)));

        let mut result = state
            .db
            .query("SELECT count() AS count FROM cart WHERE user_id = $user AND is_active = true GROUP ALL")
            .bind(("user", "user_a".to_string()))
            .await
            .unwrap();
        let row: Option<serde_json::Value> = result.take(0).unwrap();
        let active = row.and_then(|r| r["count"].as_u64()).unwrap_or(0);
        // 0 when add_item won the race and checkout consumed the cart
        assert!(active <= 1, "found {active} active carts");

        state.cart.clear("user_a").await.unwrap();
    }
}

#[tokio::test]
async fn order_snapshot_survives_catalog_price_change() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 2).await.unwrap();

    let order = state
        .checkout
        .checkout("user_a", dine_in_request(PaymentMethod::Cash))
        .await
        .unwrap();

    ProductRepository::new(state.db.clone())
        .set_price(&product_id, 99.0)
        .await
        .unwrap();

    let persisted = OrderRepository::new(state.db.clone())
        .find_by_id(&order.id_string())
        .await
        .unwrap()
        .unwrap();
    assert!((persisted.items[0].price - 5.5).abs() < f64::EPSILON);
    assert!((persisted.total - 11.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn checkout_broadcasts_new_order_then_pending_count() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Latte", 5.5).await;
    state.cart.add_item("user_a", &product_id, 1).await.unwrap();

    let mut rx = state.notifier.subscribe();
    let order = state
        .checkout
        .checkout("user_a", dine_in_request(PaymentMethod::Cash))
        .await
        .unwrap();

    let ev = recv_event(&mut rx).await;
    assert_eq!(ev.event, shared::message::EVENT_NEW_ORDER);
    assert_eq!(ev.data["orderId"], order.id_string());
    assert_eq!(ev.data["status"], "PENDING");

    let ev = recv_event(&mut rx).await;
    assert_eq!(ev.event, shared::message::EVENT_PENDING_ORDERS_UPDATED);
    assert_eq!(ev.data["count"], 1);
}
