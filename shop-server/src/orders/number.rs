//! Order number generation

use chrono::Utc;

/// `ORD-{YYYYMMDD}-{8 uppercase hex chars}`
pub fn generate_order_number() -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("ORD-{}-{}", Utc::now().format("%Y%m%d"), suffix.to_uppercase())
}
