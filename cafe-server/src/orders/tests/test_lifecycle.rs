//! Status state-machine tests

use super::*;
use crate::db::repository::OrderRepository;
use crate::orders::OrderError;
use shared::message::{EVENT_ORDER_CANCELED, EVENT_ORDER_STATUS_CHANGED, EVENT_PENDING_ORDERS_UPDATED};
use shared::order::OrderStatus;

#[tokio::test]
async fn admin_override_may_skip_states() {
    let state = test_state().await;
    let order = place_order(&state, "user_a").await;

    // Pending straight to Out for Delivery, no intermediate states
    let updated = state
        .lifecycle
        .update_status(&order.id_string(), OrderStatus::OutForDelivery)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::OutForDelivery);

    // And backwards again
    let updated = state
        .lifecycle
        .update_status(&order.id_string(), OrderStatus::Pending)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Pending);
}

#[tokio::test]
async fn update_to_same_status_is_rejected() {
    let state = test_state().await;
    let order = place_order(&state, "user_a").await;

    let err = state
        .lifecycle
        .update_status(&order.id_string(), OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Pending
        }
    ));
}

#[tokio::test]
async fn terminal_orders_are_frozen() {
    let state = test_state().await;
    let order = place_order(&state, "user_a").await;
    let order_id = order.id_string();

    state.lifecycle.cancel(&order_id).await.unwrap();

    let err = state
        .lifecycle
        .update_status(&order_id, OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::TerminalState {
            current: OrderStatus::Canceled
        }
    ));
    assert!(matches!(
        state.lifecycle.cancel(&order_id).await.unwrap_err(),
        OrderError::InvalidTransition { .. }
    ));
    assert!(matches!(
        state.lifecycle.confirm_delivery(&order_id).await.unwrap_err(),
        OrderError::InvalidTransition { .. }
    ));

    // Status in the store is untouched by the rejected calls
    let persisted = OrderRepository::new(state.db.clone())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.status, OrderStatus::Canceled);
}

#[tokio::test]
async fn confirm_delivery_requires_out_for_delivery() {
    let state = test_state().await;
    let order = place_order(&state, "user_a").await;
    let order_id = order.id_string();

    let err = state.lifecycle.confirm_delivery(&order_id).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Delivered
        }
    ));

    state
        .lifecycle
        .update_status(&order_id, OrderStatus::OutForDelivery)
        .await
        .unwrap();
    let delivered = state.lifecycle.confirm_delivery(&order_id).await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    // Delivered is terminal too: neither an override nor a late
    // cancellation gets through
    assert!(matches!(
        state
            .lifecycle
            .update_status(&order_id, OrderStatus::Pending)
            .await
            .unwrap_err(),
        OrderError::TerminalState { .. }
    ));
    assert!(matches!(
        state.lifecycle.cancel(&order_id).await.unwrap_err(),
        OrderError::InvalidTransition { .. }
    ));
}

#[tokio::test]
async fn cancellation_allowed_only_from_pending_or_preparing() {
    let state = test_state().await;

    let from_pending = place_order(&state, "user_a").await;
    state.lifecycle.cancel(&from_pending.id_string()).await.unwrap();

    let from_preparing = place_order(&state, "user_b").await;
    state
        .lifecycle
        .update_status(&from_preparing.id_string(), OrderStatus::Preparing)
        .await
        .unwrap();
    state
        .lifecycle
        .cancel(&from_preparing.id_string())
        .await
        .unwrap();

    for blocked in [OrderStatus::Processing, OrderStatus::OutForDelivery] {
        let order = place_order(&state, "user_c").await;
        state
            .lifecycle
            .update_status(&order.id_string(), blocked)
            .await
            .unwrap();
        let err = state.lifecycle.cancel(&order.id_string()).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                to: OrderStatus::Canceled,
                ..
            }
        ));
    }
}

#[tokio::test]
async fn missing_order_is_reported_as_not_found() {
    let state = test_state().await;
    let err = state
        .lifecycle
        .update_status("order:does_not_exist", OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));
}

#[tokio::test]
async fn admin_location_updates_respect_terminal_guard() {
    let state = test_state().await;
    let order = place_order(&state, "user_a").await;
    let order_id = order.id_string();

    let updated = state
        .lifecycle
        .update_admin_location(&order_id, &[120.98, 14.58])
        .await
        .unwrap();
    let location = updated.admin_location.unwrap();
    assert_eq!(location.coordinates, [120.98, 14.58]);

    let err = state
        .lifecycle
        .update_admin_location(&order_id, &[120.98])
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidLocation(_)));

    state.lifecycle.cancel(&order_id).await.unwrap();
    let err = state
        .lifecycle
        .update_admin_location(&order_id, &[120.98, 14.58])
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::TerminalState { .. }));
}

#[tokio::test]
async fn cancel_broadcast_sequence() {
    let state = test_state().await;
    let order = place_order(&state, "user_a").await;
    let order_id = order.id_string();

    // Subscribe after checkout so only the cancellation events arrive
    let mut rx = state.notifier.subscribe();
    state.lifecycle.cancel(&order_id).await.unwrap();

    let ev = recv_event(&mut rx).await;
    assert_eq!(ev.event, EVENT_ORDER_STATUS_CHANGED);
    assert_eq!(ev.data["orderId"], order_id);
    assert_eq!(ev.data["newStatus"], "CANCELED");

    let ev = recv_event(&mut rx).await;
    assert_eq!(ev.event, EVENT_ORDER_CANCELED);
    assert_eq!(ev.data["status"], "CANCELED");
    assert_eq!(ev.data["user_id"], "user_a");

    // Canceling the only pending order drops the count back to 0
    let ev = recv_event(&mut rx).await;
    assert_eq!(ev.event, EVENT_PENDING_ORDERS_UPDATED);
    assert_eq!(ev.data["count"], 0);
}

#[tokio::test]
async fn transitions_not_touching_pending_skip_the_count_broadcast() {
    let state = test_state().await;
    let order = place_order(&state, "user_a").await;
    let order_id = order.id_string();

    state
        .lifecycle
        .update_status(&order_id, OrderStatus::Preparing)
        .await
        .unwrap();

    let mut rx = state.notifier.subscribe();
    state
        .lifecycle
        .update_status(&order_id, OrderStatus::OutForDelivery)
        .await
        .unwrap();

    // Preparing -> Out for Delivery: status change only, no count event.
    // Publishing completes before update_status returns, so an empty
    // channel here really means no event was sent.
    let ev = recv_event(&mut rx).await;
    assert_eq!(ev.event, EVENT_ORDER_STATUS_CHANGED);
    assert!(rx.try_recv().is_err());
}
