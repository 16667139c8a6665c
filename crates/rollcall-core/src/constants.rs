//! Core constants for the attendance terminal.
//!
//! This module centralizes the wire-level names used when talking to the
//! remote directory and ledger, the glyphs involved in cohort normalization,
//! and the default timings of a capture cycle.
//!
//! # Remote Service Layout
//!
//! The directory and ledger are two record collections on the same HTTP
//! service:
//!
//! | Collection | Method | Path |
//! |------------|--------|------|
//! | Directory  | `GET`  | `/api/collections/students/records` |
//! | Ledger     | `POST` | `/api/collections/attendance_management/records` |
//!
//! # Usage
//!
//! ```
//! use rollcall_core::constants::*;
//!
//! let filter = format!("{DIRECTORY_FILTER_FIELD}~'{}'", "04ABCDEF");
//! assert_eq!(filter, "rfid_uid~'04ABCDEF'");
//! ```

// ============================================================================
// Remote Service Paths
// ============================================================================

/// Path of the holder directory collection, relative to the base URL.
pub const DIRECTORY_PATH: &str = "/api/collections/students/records";

/// Path of the attendance ledger collection, relative to the base URL.
pub const LEDGER_PATH: &str = "/api/collections/attendance_management/records";

/// Query parameter carrying the directory filter expression.
pub const DIRECTORY_FILTER_PARAM: &str = "filter";

/// Directory field holding the credential's canonical hex identifier.
pub const DIRECTORY_FILTER_FIELD: &str = "rfid_uid";

/// HTTP statuses the ledger answers with when an event is stored.
pub const LEDGER_SUCCESS_STATUSES: [u16; 2] = [200, 204];

// ============================================================================
// Attendance Event
// ============================================================================

/// Fixed attendance state submitted for every captured credential.
pub const STATE_PRESENT: &str = "present";

/// Calendar date format of the `date` field.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rollcall_core::constants::DATE_FORMAT;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(date.format(DATE_FORMAT).to_string(), "2024-03-01");
/// ```
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format of the `ingreso` field.
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ============================================================================
// Cohort Normalization
// ============================================================================

/// Masculine ordinal indicator (U+00BA) as typed in directory entries ("5º A").
pub const ORDINAL_GLYPH: char = '\u{00BA}';

/// Degree sign (U+00B0), the canonical cohort glyph ("5° A").
pub const CANONICAL_ORDINAL_GLYPH: char = '\u{00B0}';

// ============================================================================
// Default Configuration
// ============================================================================

/// Default base URL of the directory and ledger service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8090";

/// Default time source synchronized at boot.
pub const DEFAULT_NTP_SERVER: &str = "pool.ntp.org";

/// Default local offset from UTC in seconds (UTC-3).
pub const DEFAULT_GMT_OFFSET_SECS: i32 = -3 * 3600;

/// Default daylight-saving offset in seconds.
pub const DEFAULT_DAYLIGHT_OFFSET_SECS: i32 = 0;

/// Earliest year a synchronized clock can report.
///
/// A clock that never reached its time source starts at the epoch; any
/// reading before this year is treated as unavailable.
pub const MIN_SYNCED_YEAR: i32 = 2016;

/// Largest accepted UTC offset magnitude (UTC+14 / UTC-14).
pub const MAX_GMT_OFFSET_SECS: i32 = 14 * 3600;

/// Largest accepted daylight-saving offset magnitude.
pub const MAX_DAYLIGHT_OFFSET_SECS: i32 = 2 * 3600;

/// Default delay between two empty reader polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default duration of a feedback pulse, in milliseconds.
pub const DEFAULT_PULSE_MS: u64 = 2000;

/// Default pause after a completed cycle before polling resumes, in milliseconds.
pub const DEFAULT_COOLDOWN_MS: u64 = 3000;

/// Default transport timeout of a single directory or ledger request, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Prefix of environment variables overriding the configuration.
pub const ENV_PREFIX: &str = "ROLLCALL";
