// crates/core/src/time.rs
//! Timestamp helpers shared by the index and tracker crates.

use chrono::{DateTime, Utc};

/// Current instant, UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Whole minutes elapsed since `ts`. Clamped at zero for timestamps in
/// the future (clock skew between writers).
pub fn since_now_in_minutes(ts: &DateTime<Utc>) -> i64 {
    (Utc::now() - *ts).num_minutes().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_since_now_in_minutes() {
        let five_min_ago = Utc::now() - Duration::minutes(5);
        let elapsed = since_now_in_minutes(&five_min_ago);
        assert!((5..=6).contains(&elapsed));
    }

    #[test]
    fn test_future_timestamp_clamps_to_zero() {
        let ahead = Utc::now() + Duration::minutes(10);
        assert_eq!(since_now_in_minutes(&ahead), 0);
    }
}
