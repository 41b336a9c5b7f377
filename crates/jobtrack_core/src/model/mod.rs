//! Domain model for the job application tracker.
//!
//! # Responsibility
//! - Define the canonical Company/Event/Todo records.
//! - Own per-entity validation rules and human summary rendering.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds (UTC).

use chrono::{LocalResult, TimeZone, Utc};

pub mod company;
pub mod event;
pub mod todo;

/// Returns the current instant as epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Renders an epoch-millisecond timestamp as e.g. `Jan 05 (Monday)`.
pub fn format_created_day(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms) {
        LocalResult::Single(instant) => instant.format("%b %d (%A)").to_string(),
        _ => "unknown date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::format_created_day;

    #[test]
    fn format_created_day_renders_month_day_weekday() {
        // 2024-01-01T12:00:00Z was a Monday.
        assert_eq!(format_created_day(1_704_110_400_000), "Jan 01 (Monday)");
    }

    #[test]
    fn format_created_day_survives_out_of_range_values() {
        assert_eq!(format_created_day(i64::MAX), "unknown date");
    }
}
