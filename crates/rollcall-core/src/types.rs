use crate::{
    Result,
    constants::{CANONICAL_ORDINAL_GLYPH, DATE_FORMAT, ORDINAL_GLYPH, STATE_PRESENT, TIME_FORMAT},
    error::Error,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Render identifier bytes as uppercase hexadecimal, two digits per byte.
///
/// # Examples
///
/// ```
/// use rollcall_core::canonicalize;
///
/// assert_eq!(canonicalize(&[0x04, 0xAB, 0x0C]), "04AB0C");
/// assert_eq!(canonicalize(&[]), "");
/// ```
#[must_use]
pub fn canonicalize(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Replace every masculine ordinal indicator with the degree sign.
///
/// Directory entries are typed by hand and mix "5º A" with "5° A"; the
/// degree sign is the form shown and submitted to the ledger.
///
/// # Examples
///
/// ```
/// use rollcall_core::normalize_cohort;
///
/// assert_eq!(normalize_cohort("5\u{00BA} A"), "5\u{00B0} A");
/// assert_eq!(normalize_cohort("Lab"), "Lab");
/// ```
#[must_use]
pub fn normalize_cohort(cohort: &str) -> String {
    cohort.replace(ORDINAL_GLYPH, &CANONICAL_ORDINAL_GLYPH.to_string())
}

/// Canonical identifier of a presented credential.
///
/// Always uppercase hexadecimal with an even number of digits, so two reads
/// of the same token compare and transmit identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialId(String);

impl CredentialId {
    /// Build the identifier from the raw bytes reported by the radio.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` if `bytes` is empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidCredential(
                "Credential identifier has no bytes".to_string(),
            ));
        }
        Ok(CredentialId(canonicalize(bytes)))
    }

    /// Get the canonical hex form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of identifier bytes the canonical form encodes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.0.len() / 2
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CredentialId {
    type Err = Error;

    /// Parse a hex identifier, accepting lowercase digits and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim();

        if hex.is_empty() {
            return Err(Error::InvalidCredential("Empty identifier".to_string()));
        }
        if hex.len() % 2 != 0 {
            return Err(Error::InvalidCredential(format!(
                "Identifier must have an even number of hex digits, got {}",
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidCredential(format!(
                "Identifier is not hexadecimal: {hex}"
            )));
        }

        Ok(CredentialId(hex.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CredentialId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CredentialId> for String {
    fn from(id: CredentialId) -> Self {
        id.0
    }
}

/// Directory entry a credential resolved to.
///
/// Only produced by a directory lookup; the cohort is normalized on
/// construction so every consumer sees the same form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderRecord {
    holder_id: String,
    given_name: String,
    family_name: String,
    cohort: String,
}

impl HolderRecord {
    /// Create a holder record, normalizing the cohort.
    pub fn new(
        holder_id: impl Into<String>,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        cohort: &str,
    ) -> Self {
        Self {
            holder_id: holder_id.into(),
            given_name: given_name.into(),
            family_name: family_name.into(),
            cohort: normalize_cohort(cohort),
        }
    }

    #[must_use]
    pub fn holder_id(&self) -> &str {
        &self.holder_id
    }

    #[must_use]
    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    #[must_use]
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    #[must_use]
    pub fn cohort(&self) -> &str {
        &self.cohort
    }

    /// Given name followed by family name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
            .trim()
            .to_string()
    }
}

/// Attendance state recorded by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceState {
    Present,
}

impl AttendanceState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceState::Present => STATE_PRESENT,
        }
    }
}

impl fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event submitted to the attendance ledger.
///
/// Serializes to the ledger's field names (`student`, `course`, `ingreso`).
/// Without a clock reading the `date` and `ingreso` fields are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEvent {
    #[serde(rename = "student")]
    holder_id: String,

    state: AttendanceState,

    #[serde(rename = "course")]
    cohort: String,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_date"
    )]
    date: Option<NaiveDate>,

    #[serde(
        rename = "ingreso",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_time"
    )]
    time: Option<NaiveTime>,
}

impl AttendanceEvent {
    /// Build a "present" event for `holder` stamped with the local reading `at`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rollcall_core::{AttendanceEvent, HolderRecord};
    ///
    /// let holder = HolderRecord::new("abc123", "Ana", "Paz", "5\u{00BA} A");
    /// let at = NaiveDate::from_ymd_opt(2024, 3, 1)
    ///     .unwrap()
    ///     .and_hms_opt(8, 15, 0)
    ///     .unwrap();
    ///
    /// let event = AttendanceEvent::new(&holder, Some(at));
    /// assert!(event.is_timestamped());
    /// assert_eq!(event.cohort(), "5\u{00B0} A");
    /// ```
    #[must_use]
    pub fn new(holder: &HolderRecord, at: Option<NaiveDateTime>) -> Self {
        Self {
            holder_id: holder.holder_id().to_string(),
            state: AttendanceState::Present,
            cohort: holder.cohort().to_string(),
            date: at.map(|dt| dt.date()),
            time: at.map(|dt| dt.time()),
        }
    }

    #[must_use]
    pub fn holder_id(&self) -> &str {
        &self.holder_id
    }

    #[must_use]
    pub fn state(&self) -> AttendanceState {
        self.state
    }

    #[must_use]
    pub fn cohort(&self) -> &str {
        &self.cohort
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[must_use]
    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    /// Returns `true` if the event carries a date and time.
    #[must_use]
    pub fn is_timestamped(&self) -> bool {
        self.date.is_some() && self.time.is_some()
    }
}

fn serialize_date<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
        None => serializer.serialize_none(),
    }
}

fn serialize_time<S: Serializer>(
    time: &Option<NaiveTime>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match time {
        Some(time) => serializer.collect_str(&time.format(TIME_FORMAT)),
        None => serializer.serialize_none(),
    }
}

/// Why a remote request did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCode {
    /// The service answered with an unexpected HTTP status.
    Status(u16),

    /// The service could not be reached or the connection broke.
    Transport,

    /// The service answered successfully but the body could not be decoded.
    MalformedResponse,
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureCode::Status(status) => write!(f, "HTTP {status}"),
            FailureCode::Transport => write!(f, "transport failure"),
            FailureCode::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// Result of one capture cycle, used to pick the feedback signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Holder resolved and event stored with its timestamp.
    Success,

    /// Credential unknown to the directory.
    NotFound,

    /// Directory lookup or ledger submission failed.
    RequestFailed(FailureCode),

    /// Event stored, but without date and time.
    ClockUnavailable,
}

impl Outcome {
    /// Returns `true` if the cycle earns the success signal.
    ///
    /// A missing clock degrades the event but never fails the cycle.
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success | Outcome::ClockUnavailable)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::NotFound => write!(f, "NotFound"),
            Outcome::RequestFailed(code) => write!(f, "RequestFailed({code})"),
            Outcome::ClockUnavailable => write!(f, "ClockUnavailable"),
        }
    }
}
