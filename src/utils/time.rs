// src/utils/time.rs

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::DbError;

/// Timestamps are persisted as INTEGER epoch milliseconds.
pub fn to_millis(at: &DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Drops sub-millisecond precision so a value compares equal to what storage returns.
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

pub fn from_millis(millis: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DbError::Decode(format!("timestamp {} is out of range", millis)))
}
