//! Time and timestamp utilities

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};

/// Get current Unix timestamp in seconds, with sub-second precision
pub fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Format a local time as `YYYY-mm-dd_HH-MM-SS` (safe for file names)
pub fn file_stamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d_%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_current_timestamp_is_recent() {
        // 2023-11-14, well before any test run
        assert!(current_timestamp() > 1_700_000_000.0);
    }

    #[test]
    fn test_file_stamp_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(file_stamp(at), "2024-03-09_07-05-01");
    }
}
