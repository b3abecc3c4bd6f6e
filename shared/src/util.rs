/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Render a millisecond timestamp as `YYYY-MM-DD HH:MM:SS` (UTC)
///
/// Out-of-range values render as the raw number.
pub fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        // 2024-01-01 00:00:00 UTC
        assert_eq!(format_millis(1_704_067_200_000), "2024-01-01 00:00:00");
        assert_eq!(format_millis(1_704_067_261_500), "2024-01-01 00:01:01");
    }

    #[test]
    fn test_now_millis_is_recent() {
        assert!(now_millis() > 1_704_067_200_000);
    }
}
