//! Booking policy and store configuration
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_MIN_DURATION_DAYS: u32 = 7;

const MIN_DURATION_ENV: &str = "ADSPACE_MIN_BOOKING_DAYS";
const DB_PATH_ENV: &str = "ADSPACE_DB_PATH";

/// Business rules applied when a booking request is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Shortest allowed booking, counted inclusively.
    pub min_duration_days: u32,
    /// Reject requests against ad spaces that are not AVAILABLE.
    pub require_available_space: bool,
    /// Reject requests whose dates overlap an approved booking on the same space.
    pub reject_overlapping_approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            min_duration_days: DEFAULT_MIN_DURATION_DAYS,
            require_available_space: true,
            reject_overlapping_approved: true,
        }
    }
}

impl BookingPolicy {
    pub fn with_min_duration_days(mut self, days: u32) -> Self {
        self.min_duration_days = days;
        self
    }

    /// Defaults overridden by `ADSPACE_MIN_BOOKING_DAYS` when it is set.
    pub fn from_env() -> Self {
        let policy = Self::default();
        match std::env::var(MIN_DURATION_ENV) {
            Ok(raw) => match parse_min_duration(&raw) {
                Some(days) => policy.with_min_duration_days(days),
                None => {
                    warn!(value = %raw, "ignoring invalid {MIN_DURATION_ENV}");
                    policy
                }
            },
            Err(_) => policy,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::var(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("adspace.db")),
        }
    }
}

// a booking is always at least one day
fn parse_min_duration(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|days| *days >= 1)
}
