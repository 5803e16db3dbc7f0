//! Admin session record with 24 hour expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long an admin login stays valid.
pub fn session_ttl() -> Duration {
    Duration::hours(24)
}

/// Stored admin login: flag plus login time in epoch milliseconds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub is_logged_in: bool,
    pub timestamp: i64,
}

impl AdminSession {
    /// A logged-in session started at `now`.
    pub fn login_at(now: DateTime<Utc>) -> Self {
        Self {
            is_logged_in: true,
            timestamp: now.timestamp_millis(),
        }
    }

    /// Valid only if logged in and less than 24 hours old at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.timestamp_millis() - self.timestamp;
        self.is_logged_in && age_ms < session_ttl().num_milliseconds()
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}
