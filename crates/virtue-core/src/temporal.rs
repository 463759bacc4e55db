//! # Temporal Types — Epoch-Millisecond Timestamps
//!
//! `Timestamp` is a UTC instant truncated to millisecond precision. On the
//! wire it is an integer count of milliseconds since the Unix epoch, which
//! is what the browser client produces and sorts on.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VirtueError;

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 86_400_000;

/// A UTC timestamp with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self(truncate_to_millis(Utc::now()))
    }

    /// From a Unix epoch offset in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`VirtueError::InvalidTimestamp`] when the value is outside
    /// the range chrono can represent.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, VirtueError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or(VirtueError::InvalidTimestamp(millis))
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The instant `days` whole days before this one, saturating at this
    /// instant if the result would be unrepresentable.
    pub fn days_before(&self, days: i64) -> Self {
        days.checked_mul(DAY_MILLIS)
            .and_then(|delta| self.epoch_millis().checked_sub(delta))
            .and_then(|millis| Self::from_epoch_millis(millis).ok())
            .unwrap_or(*self)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000;
    dt.with_nanosecond(millis * 1_000_000).unwrap_or(dt)
}
