//! Attendance ledger recorder.
//!
//! Samples the wall clock, builds the attendance event and submits it with a
//! single POST. A clock that never synchronized does not block the cycle: the
//! event goes out without date and time.

#![allow(async_fn_in_trait)]

use crate::client::ClientConfig;
use crate::error::{NetworkError, Result};
use rollcall_core::constants::{LEDGER_PATH, LEDGER_SUCCESS_STATUSES};
use rollcall_core::{AttendanceEvent, HolderRecord, Outcome, WallClock};
use tracing::{debug, info, warn};

/// How a stored event was stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Stored with date and time.
    Timestamped,

    /// Stored without date and time.
    Untimestamped,
}

impl Delivery {
    /// Cycle outcome of a stored event.
    #[must_use]
    pub fn outcome(self) -> Outcome {
        match self {
            Delivery::Timestamped => Outcome::Success,
            Delivery::Untimestamped => Outcome::ClockUnavailable,
        }
    }
}

/// Append-only ledger of attendance events.
pub trait AttendanceLedger: Send + Sync {
    /// Record a "present" event for `holder`.
    ///
    /// # Errors
    ///
    /// Returns a request failure if the event was not stored.
    async fn record(&self, holder: &HolderRecord) -> Result<Delivery>;
}

/// HTTP client for the attendance ledger collection.
#[derive(Debug, Clone)]
pub struct AttendanceRecorder<C: WallClock> {
    http: reqwest::Client,
    url: String,
    clock: C,
}

impl<C: WallClock> AttendanceRecorder<C> {
    /// Create a recorder with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Setup` if the client cannot be built.
    pub fn new(config: &ClientConfig, clock: C) -> Result<Self> {
        Ok(Self::with_client(config.build_client()?, config, clock))
    }

    /// Create a recorder sharing an existing HTTP client.
    pub fn with_client(http: reqwest::Client, config: &ClientConfig, clock: C) -> Self {
        Self {
            http,
            url: config.url(LEDGER_PATH),
            clock,
        }
    }

    /// Build the event for `holder` from the current clock reading.
    pub fn event_for(&self, holder: &HolderRecord) -> AttendanceEvent {
        let now = self.clock.now();
        if now.is_none() {
            warn!(
                holder = holder.holder_id(),
                "Clock not synchronized, submitting event without date and time"
            );
        }
        AttendanceEvent::new(holder, now)
    }

    /// Collection URL written by this recorder.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: WallClock> AttendanceLedger for AttendanceRecorder<C> {
    async fn record(&self, holder: &HolderRecord) -> Result<Delivery> {
        let event = self.event_for(holder);
        let delivery = if event.is_timestamped() {
            Delivery::Timestamped
        } else {
            Delivery::Untimestamped
        };

        debug!(
            url = %self.url,
            payload = %serde_json::to_string(&event).unwrap_or_default(),
            "Submitting attendance event"
        );

        let response = self.http.post(&self.url).json(&event).send().await?;

        let status = response.status().as_u16();
        if !LEDGER_SUCCESS_STATUSES.contains(&status) {
            return Err(NetworkError::Status { status });
        }

        info!(
            holder = holder.holder_id(),
            cohort = holder.cohort(),
            status,
            ?delivery,
            "Attendance recorded"
        );
        Ok(delivery)
    }
}
