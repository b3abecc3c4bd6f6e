//! Order notifications over WhatsApp
//!
//! - [`OrderNotifier`] - seam used by the order flow
//! - [`NotificationGateway`] - formats templates and hands them to a [`WhatsAppTransport`]

pub mod template;
pub mod transport;

pub use transport::WhatsAppTransport;

use async_trait::async_trait;
use shared::models::{Order, OrderStatus};

/// Best-effort order notifications
///
/// Implementations never fail; the return value only reports delivery.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Tell the shop about a newly placed order
    async fn notify_new_order(&self, order: &Order) -> bool;

    /// Tell the customer their order moved to `new_status`
    async fn notify_status_change(&self, order: &Order, new_status: OrderStatus) -> bool;
}

/// WhatsApp-backed notifier
#[derive(Debug, Clone)]
pub struct NotificationGateway {
    transport: WhatsAppTransport,
    admin_number: String,
    client: reqwest::Client,
}

impl NotificationGateway {
    pub fn new(transport: WhatsAppTransport, admin_number: impl Into<String>) -> Self {
        Self {
            transport,
            admin_number: admin_number.into(),
            client: transport::http_client(),
        }
    }

    pub fn transport(&self) -> &WhatsAppTransport {
        &self.transport
    }
}

#[async_trait]
impl OrderNotifier for NotificationGateway {
    async fn notify_new_order(&self, order: &Order) -> bool {
        let text = template::new_order_message(order);
        let sent = self.transport.send(&self.client, &self.admin_number, &text).await;
        if !sent {
            tracing::warn!(order_number = %order.order_number, "New order notification not delivered");
        }
        sent
    }

    async fn notify_status_change(&self, order: &Order, new_status: OrderStatus) -> bool {
        let text = template::status_change_message(order, new_status);
        let sent = self
            .transport
            .send(&self.client, &order.customer_phone, &text)
            .await;
        if !sent {
            tracing::warn!(
                order_number = %order.order_number,
                status = %new_status,
                "Status change notification not delivered"
            );
        }
        sent
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Notifier doubles for order-flow tests

    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every call and answers with a fixed result
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub succeed: bool,
        pub new_orders: Mutex<Vec<String>>,
        pub status_changes: Mutex<Vec<(String, OrderStatus)>>,
    }

    impl RecordingNotifier {
        pub fn succeeding() -> Self {
            Self {
                succeed: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl OrderNotifier for RecordingNotifier {
        async fn notify_new_order(&self, order: &Order) -> bool {
            self.new_orders
                .lock()
                .unwrap()
                .push(order.order_number.clone());
            self.succeed
        }

        async fn notify_status_change(&self, order: &Order, new_status: OrderStatus) -> bool {
            self.status_changes
                .lock()
                .unwrap()
                .push((order.order_number.clone(), new_status));
            self.succeed
        }
    }

    /// Shuts the database pool down while reporting delivery
    pub struct PoolClosingNotifier {
        pub pool: sqlx::SqlitePool,
    }

    #[async_trait]
    impl OrderNotifier for PoolClosingNotifier {
        async fn notify_new_order(&self, _order: &Order) -> bool {
            self.pool.close().await;
            true
        }

        async fn notify_status_change(&self, _order: &Order, _new_status: OrderStatus) -> bool {
            true
        }
    }

    /// Never answers within any reasonable timeout
    pub struct StalledNotifier;

    #[async_trait]
    impl OrderNotifier for StalledNotifier {
        async fn notify_new_order(&self, _order: &Order) -> bool {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            true
        }

        async fn notify_status_change(&self, _order: &Order, _new_status: OrderStatus) -> bool {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: 1,
            order_number: "ORD-20240101-00000001".into(),
            customer_name: "Bo".into(),
            customer_phone: "+15550001".into(),
            customer_address: "1 Main St".into(),
            status: OrderStatus::Pending,
            total_amount: 10.0,
            notes: None,
            notification_sent: false,
            created_at: 1_704_067_200_000,
            updated_at: None,
            items: vec![],
        }
    }

    #[tokio::test]
    async fn test_disabled_gateway_reports_failure() {
        let gateway = NotificationGateway::new(WhatsAppTransport::Disabled, "+1234567890");
        assert!(!gateway.notify_new_order(&order()).await);
        assert!(
            !gateway
                .notify_status_change(&order(), OrderStatus::Confirmed)
                .await
        );
    }

    #[tokio::test]
    async fn test_logging_gateway_reports_success() {
        let gateway = NotificationGateway::new(WhatsAppTransport::LoggingOnly, "+1234567890");
        assert!(gateway.notify_new_order(&order()).await);
    }
}
