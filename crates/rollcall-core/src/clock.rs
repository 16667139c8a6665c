//! Wall-clock access.
//!
//! The terminal's clock is synchronized once at boot from an external time
//! source; the terminal only ever asks it for the current local date and
//! time. A clock that never synchronized reports nothing, and the attendance
//! event is then submitted without a timestamp.

use crate::config::ClockConfig;
use crate::constants::MIN_SYNCED_YEAR;
use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Utc};

/// Source of the current local date and time.
pub trait WallClock: Send + Sync {
    /// Current local date and time, or `None` if the clock is not synchronized.
    fn now(&self) -> Option<NaiveDateTime>;
}

/// Clock backed by the system time shifted by the configured offsets.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Timelike, Utc};
/// use rollcall_core::SystemClock;
/// use rollcall_core::config::ClockConfig;
///
/// let clock = SystemClock::new(&ClockConfig::default()).unwrap();
/// let utc = Utc.with_ymd_and_hms(2024, 3, 1, 11, 15, 0).unwrap();
///
/// // UTC-3
/// assert_eq!(clock.local_from_utc(utc).unwrap().hour(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Create a clock applying the UTC and daylight-saving offsets of `config`.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if the combined offset is not a valid
    /// UTC offset (a day or more).
    pub fn new(config: &ClockConfig) -> Result<Self> {
        let offset =
            FixedOffset::east_opt(config.total_offset_secs()).ok_or_else(|| Error::InvalidConfig {
                key: "clock".to_string(),
                reason: format!("offset of {}s is out of range", config.total_offset_secs()),
            })?;
        Ok(Self { offset })
    }

    /// Offset applied to UTC.
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local reading for a given UTC instant, `None` if the instant predates
    /// any synchronized time.
    #[must_use]
    pub fn local_from_utc(&self, utc: DateTime<Utc>) -> Option<NaiveDateTime> {
        if utc.year() < MIN_SYNCED_YEAR {
            return None;
        }
        Some(utc.with_timezone(&self.offset).naive_local())
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> Option<NaiveDateTime> {
        self.local_from_utc(Utc::now())
    }
}

/// Clock frozen at a single reading, or permanently unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(Option<NaiveDateTime>);

impl FixedClock {
    /// Clock always reporting `at`.
    #[must_use]
    pub fn at(at: NaiveDateTime) -> Self {
        Self(Some(at))
    }

    /// Clock that never synchronized.
    #[must_use]
    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> Option<NaiveDateTime> {
        self.0
    }
}

impl<C: WallClock + ?Sized> WallClock for std::sync::Arc<C> {
    fn now(&self) -> Option<NaiveDateTime> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rstest::rstest;

    fn clock(gmt: i32, dst: i32) -> SystemClock {
        SystemClock::new(&ClockConfig {
            gmt_offset_secs: gmt,
            daylight_offset_secs: dst,
            ..ClockConfig::default()
        })
        .unwrap()
    }

    #[rstest]
    #[case(-3 * 3600, 0, "2024-03-01 08:15:00")]
    #[case(0, 0, "2024-03-01 11:15:00")]
    #[case(-4 * 3600, 3600, "2024-03-01 08:15:00")]
    #[case(13 * 3600, 0, "2024-03-02 00:15:00")]
    fn test_local_from_utc(#[case] gmt: i32, #[case] dst: i32, #[case] expected: &str) {
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 11, 15, 0).unwrap();
        let local = clock(gmt, dst).local_from_utc(utc).unwrap();
        assert_eq!(local.format("%Y-%m-%d %H:%M:%S").to_string(), expected);
    }

    #[test]
    fn test_unsynchronized_clock_is_unavailable() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 5).unwrap();
        assert_eq!(clock(0, 0).local_from_utc(epoch), None);
    }

    #[test]
    fn test_system_clock_now_is_available() {
        let now = clock(0, 0).now().unwrap();
        assert!(now.year() >= MIN_SYNCED_YEAR);
    }

    #[test]
    fn test_offset_out_of_range() {
        let config = ClockConfig {
            gmt_offset_secs: 86_400,
            ..ClockConfig::default()
        };
        assert!(SystemClock::new(&config).is_err());
    }

    #[test]
    fn test_fixed_clock() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        assert_eq!(FixedClock::at(at).now(), Some(at));
        assert_eq!(FixedClock::unavailable().now(), None);

        let shared = std::sync::Arc::new(FixedClock::at(at));
        assert_eq!(shared.now(), Some(at));
    }
}
