//! Document field conversion helpers
//!
//! The store persists instants as epoch milliseconds. Reads are defensive:
//! partially-migrated documents may still carry an RFC 3339 string where a
//! timestamp is expected, and both readings are accepted.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value as JsonValue;

/// Convert an instant to the store's timestamp representation
pub(crate) fn to_store_ms(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

/// Current instant in the store's timestamp representation
pub(crate) fn now_ms() -> i64 {
    to_store_ms(Utc::now())
}

/// Read an instant from a document field
///
/// Accepts epoch milliseconds (integer or float) or an RFC 3339 string.
pub(crate) fn read_instant(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::Number(n) => {
            let ms = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(ms).single()
        }
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Read a string field, empty when absent
pub(crate) fn read_string(fields: &JsonValue, key: &str) -> String {
    fields
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instant_roundtrip_through_millis() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
        let decoded = read_instant(&json!(to_store_ms(instant))).unwrap();
        assert_eq!(decoded, instant);
    }

    #[test]
    fn test_read_instant_accepts_rfc3339_string() {
        let decoded = read_instant(&json!("2026-03-14T15:09:26Z")).unwrap();
        assert_eq!(decoded, Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap());
    }

    #[test]
    fn test_read_instant_rejects_other_shapes() {
        assert!(read_instant(&json!(null)).is_none());
        assert!(read_instant(&json!({"seconds": 12})).is_none());
        assert!(read_instant(&json!("not a date")).is_none());
    }
}
