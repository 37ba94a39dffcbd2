//! Timestamp helpers.

use chrono::Utc;

/// Returns the current UTC time as an ISO 8601 string with microsecond
/// precision, e.g. `2024-05-01T12:00:00.000000+00:00`.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
