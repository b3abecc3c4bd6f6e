//! WhatsApp message templates

use shared::models::{Order, OrderStatus};
use shared::util::format_millis;
use std::fmt::Write;

/// Message sent to the admin number when an order is placed
pub fn new_order_message(order: &Order) -> String {
    let mut message = format!(
        "🛒 *NEW ORDER RECEIVED*\n\n\
         📋 *Order Details:*\n\
         • Order Number: {}\n\
         • Customer: {}\n\
         • Phone: {}\n\
         • Total: ${:.2}\n\n\
         📍 *Delivery Address:*\n\
         {}\n\n\
         🛍️ *Items Ordered:*\n",
        order.order_number,
        order.customer_name,
        order.customer_phone,
        order.total_amount,
        order.customer_address,
    );

    for item in &order.items {
        // writing to a String cannot fail
        let _ = writeln!(
            message,
            "• {} x{} - ${:.2}",
            item.product_name, item.quantity, item.price
        );
    }

    if let Some(notes) = order.notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(message, "\n📝 *Customer Notes:*\n{notes}");
    }

    let _ = write!(
        message,
        "\n\n⏰ *Order Time:* {}\n\n👆 *Please confirm this order and prepare for delivery!*",
        format_millis(order.created_at)
    );
    message
}

/// Customer-facing line for a status
pub fn status_line(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Confirmed => "✅ Your order has been confirmed and is being prepared!",
        OrderStatus::Preparing => "👨‍🍳 Your order is being prepared with care!",
        OrderStatus::Ready => "🎉 Your order is ready for pickup/delivery!",
        OrderStatus::Delivered => "📦 Your order has been delivered. Thank you for your order!",
        OrderStatus::Cancelled => {
            "❌ Your order has been cancelled. Please contact us if you have any questions."
        }
        OrderStatus::Pending => OrderStatus::Pending.as_str(),
    }
}

/// Message sent to the customer's phone after an admin status change
pub fn status_change_message(order: &Order, new_status: OrderStatus) -> String {
    format!(
        "📋 *Order Update*\n\n\
         Order Number: {}\n\
         Status: {}\n\n\
         Customer: {}\n\
         Total: ${:.2}\n\n\
         Thank you for choosing us! 🙏",
        order.order_number,
        status_line(new_status),
        order.customer_name,
        order.total_amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderItem;

    fn order() -> Order {
        Order {
            id: 1,
            order_number: "ORD-20240102-ABCDEF12".into(),
            customer_name: "Ana".into(),
            customer_phone: "+34600000000".into(),
            customer_address: "Calle Mayor 1".into(),
            status: OrderStatus::Pending,
            total_amount: 42.5,
            notes: None,
            notification_sent: false,
            // 2024-01-02 03:04:05 UTC
            created_at: 1_704_164_645_000,
            updated_at: None,
            items: vec![
                OrderItem {
                    id: 1,
                    order_id: 1,
                    product_id: 7,
                    product_name: "Olive Oil".into(),
                    quantity: 2,
                    price: 12.5,
                    created_at: 1_704_164_645_000,
                },
                OrderItem {
                    id: 2,
                    order_id: 1,
                    product_id: 8,
                    product_name: "Bread".into(),
                    quantity: 1,
                    price: 17.5,
                    created_at: 1_704_164_645_000,
                },
            ],
        }
    }

    #[test]
    fn test_new_order_message() {
        let msg = new_order_message(&order());
        assert!(msg.starts_with("🛒 *NEW ORDER RECEIVED*"));
        assert!(msg.contains("• Order Number: ORD-20240102-ABCDEF12"));
        assert!(msg.contains("• Total: $42.50"));
        assert!(msg.contains("📍 *Delivery Address:*\nCalle Mayor 1"));
        assert!(msg.contains("• Olive Oil x2 - $12.50\n"));
        assert!(msg.contains("• Bread x1 - $17.50\n"));
        assert!(msg.contains("⏰ *Order Time:* 2024-01-02 03:04:05"));
        assert!(!msg.contains("Customer Notes"));
        assert!(msg.ends_with("👆 *Please confirm this order and prepare for delivery!*"));
    }

    #[test]
    fn test_new_order_message_with_notes() {
        let mut o = order();
        o.notes = Some("Ring twice".into());
        let msg = new_order_message(&o);
        assert!(msg.contains("📝 *Customer Notes:*\nRing twice"));
    }

    #[test]
    fn test_status_change_message() {
        let msg = status_change_message(&order(), OrderStatus::Ready);
        assert!(msg.contains("Order Number: ORD-20240102-ABCDEF12"));
        assert!(msg.contains("Status: 🎉 Your order is ready for pickup/delivery!"));
        assert!(msg.contains("Customer: Ana"));
        assert!(msg.contains("Total: $42.50"));
    }

    #[test]
    fn test_pending_uses_raw_status() {
        assert_eq!(status_line(OrderStatus::Pending), "pending");
    }
}
