use chrono::{DateTime, TimeZone, Utc};

/// Current wall clock in unix milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Converts unix milliseconds back into a UTC timestamp.
///
/// Out-of-range values clamp to the unix epoch.
pub fn from_ms(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}
