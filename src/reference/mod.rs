//! Reference time domain — the trusted clock a DVR reading is compared to.
//!
//! Public API for resolving "official" time from a prioritized list of
//! network time services, degrading to the local device clock.
//!
//! Providers:
//!   - provider.rs — catalogue of known time services
//!   - http.rs     — `TimeProvider` seam + reqwest implementation
//!   - payload.rs  — response-shape normalization
//!   - resolver.rs — sequential fallback loop

mod http;
mod payload;
pub mod provider;
mod resolver;

pub use http::{HttpTimeProvider, TimeProvider};
pub use payload::parse_time_payload;
pub use provider::{NaiveZone, ProviderInfo};
pub use resolver::{ProviderFailure, ReferenceTimeResolver, Resolution};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// `source` value used when every provider failed and the device clock
/// was used instead.
pub const LOCAL_FALLBACK_SOURCE: &str = "local fallback";

/// The baseline time a DVR reading is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Calendar date reported alongside the time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Provider id, or [`LOCAL_FALLBACK_SOURCE`].
    pub source: String,
}

impl ReferenceTime {
    pub fn from_datetime(at: NaiveDateTime, source: impl Into<String>) -> Self {
        Self {
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
            date: Some(at.date()),
            source: source.into(),
        }
    }

    pub fn local_fallback(now: NaiveDateTime) -> Self {
        Self::from_datetime(now, LOCAL_FALLBACK_SOURCE)
    }

    /// True when no network provider answered. The UI should warn that the
    /// comparison is only as good as the device clock.
    pub fn is_local_fallback(&self) -> bool {
        self.source == LOCAL_FALLBACK_SOURCE
    }

    pub fn seconds_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

/// Failure of a single provider. Always recovered inside the resolver.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("response has no recognized date-time field")]
    UnrecognizedShape,
    #[error("unparseable date-time {0:?}")]
    InvalidDateTime(String),
}
