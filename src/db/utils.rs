//! Database utility functions.

use chrono::{DateTime, Utc};

/// Generate a random UUID string for database entities.
pub fn generate_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Get the current UTC timestamp.
///
/// Truncated to milliseconds so values survive a round-trip through every
/// backend unchanged.
pub fn current_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_entity_id_is_unique() {
        let a = generate_entity_id();
        let b = generate_entity_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_current_timestamp_has_millisecond_precision() {
        let ts = current_timestamp();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
