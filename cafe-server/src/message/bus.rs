//! 通知总线核心实现
//!
//! # 架构
//!
//! ```text
//! Checkout / Lifecycle ──▶ publish() ──▶ broadcast::Sender<BusEvent>
//!                                              │
//!                            ┌─────────────────┼─────────────────┐
//!                            ▼                 ▼                 ▼
//!                      admin dashboard   order tracking     (tests)
//! ```
//!
//! Delivery is best-effort / at-most-once: the channel drops events for
//! lagging or disconnected subscribers, and a reconnecting subscriber
//! re-pulls authoritative state (pending count, order status) over the
//! query API instead of expecting a replay. Publish failures never
//! propagate into the state-changing operation that triggered them.

use shared::message::BusEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Configuration for the notifier
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Capacity of the broadcast channel (default: 1024)
    pub channel_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// 通知总线 - 负责事件扇出
///
/// Cloning is cheap; all clones share the same channel. The notifier is
/// constructed once and injected into the checkout orchestrator and the
/// lifecycle engine - there is no module-level singleton.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<BusEvent>,
    shutdown_token: CancellationToken,
}

impl Notifier {
    /// 创建默认容量的通知总线
    pub fn new() -> Self {
        Self::from_config(NotifierConfig::default())
    }

    pub fn from_config(config: NotifierConfig) -> Self {
        let (tx, _) = broadcast::channel(config.channel_capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 发布事件 (服务器 -> 所有订阅者)
    ///
    /// Fire-and-forget: having no subscribers is not an error, and any
    /// other failure is logged and swallowed so a broadcast problem can
    /// never fail an otherwise-successful state change.
    pub fn publish(&self, event: BusEvent) {
        match self.tx.send(event) {
            Ok(n) => {
                tracing::debug!(subscribers = n, "Event published");
            }
            Err(broadcast::error::SendError(event)) => {
                // No receivers connected right now
                tracing::debug!(event = %event.event, "Event dropped (no subscribers)");
            }
        }
    }

    /// 订阅服务器广播
    ///
    /// Subscribers only receive events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.tx.subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭通知总线
    pub fn shutdown(&self) {
        tracing::info!("Shutting down notifier");
        self.shutdown_token.cancel();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::Room;
    use serde_json::json;

    #[tokio::test]
    async fn fan_out_reaches_every_subscriber() {
        let notifier = Notifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.publish(BusEvent::broadcast("new-order", json!({"orderId": "order:1"})));

        let ev_a = a.recv().await.unwrap();
        let ev_b = b.recv().await.unwrap();
        assert_eq!(ev_a.event, "new-order");
        assert_eq!(ev_a, ev_b);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let notifier = Notifier::new();
        // Must not panic or fail
        notifier.publish(BusEvent::broadcast("pending-orders-updated", json!({"count": 0})));
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn disconnected_subscriber_misses_events() {
        let notifier = Notifier::new();

        {
            let _early = notifier.subscribe();
            // dropped here - simulates a disconnect
        }

        notifier.publish(BusEvent::new(
            Room::Admin,
            "order-status-changed",
            json!({"orderId": "order:1", "newStatus": "PREPARING"}),
        ));

        // A late subscriber sees nothing published before it connected;
        // it must reconcile by re-querying authoritative state.
        let mut late = notifier.subscribe();
        notifier.publish(BusEvent::broadcast("pending-orders-updated", json!({"count": 3})));
        let ev = late.recv().await.unwrap();
        assert_eq!(ev.event, "pending-orders-updated");
        assert!(late.try_recv().is_err());
    }
}
