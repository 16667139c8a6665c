//! Terminal configuration.
//!
//! The configuration is assembled once at start-up from three layers, later
//! layers overriding earlier ones:
//!
//! 1. Built-in defaults (see [`constants`](crate::constants))
//! 2. An optional file (TOML, YAML or JSON, picked by extension)
//! 3. Environment variables prefixed with `ROLLCALL`, sections separated by
//!    a double underscore (`ROLLCALL_SERVER__BASE_URL`)
//!
//! The result is validated and then only ever shared by reference.
//!
//! # Examples
//!
//! ```
//! use rollcall_core::TerminalConfig;
//!
//! let config = TerminalConfig::default();
//! assert_eq!(config.server.base_url, "http://127.0.0.1:8090");
//! assert!(config.validate().is_ok());
//! ```

use crate::constants::*;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Wireless network the terminal joins at boot.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Directory and ledger service.
    #[serde(default)]
    pub server: ServerConfig,

    /// Wall-clock synchronization and local offsets.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Capture cycle pacing.
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Network credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network name.
    #[serde(default)]
    pub ssid: String,

    /// Network secret.
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Remote service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL shared by the directory and the ledger.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout of one request, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    /// Base URL without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Time source synchronized once at boot.
    #[serde(default = "default_ntp_server")]
    pub ntp_server: String,

    /// Local offset from UTC, in seconds.
    #[serde(default = "default_gmt_offset_secs")]
    pub gmt_offset_secs: i32,

    /// Additional daylight-saving offset, in seconds.
    #[serde(default)]
    pub daylight_offset_secs: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            ntp_server: default_ntp_server(),
            gmt_offset_secs: DEFAULT_GMT_OFFSET_SECS,
            daylight_offset_secs: DEFAULT_DAYLIGHT_OFFSET_SECS,
        }
    }
}

impl ClockConfig {
    /// Total offset applied to UTC to obtain local time, in seconds.
    #[must_use]
    pub fn total_offset_secs(&self) -> i32 {
        self.gmt_offset_secs + self.daylight_offset_secs
    }
}

/// Capture cycle timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between two empty polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Feedback pulse duration, in milliseconds.
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,

    /// Pause after a completed cycle, in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            pulse_ms: DEFAULT_PULSE_MS,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_ntp_server() -> String {
    DEFAULT_NTP_SERVER.to_string()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_gmt_offset_secs() -> i32 {
    DEFAULT_GMT_OFFSET_SECS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_pulse_ms() -> u64 {
    DEFAULT_PULSE_MS
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

impl TerminalConfig {
    /// Load the configuration from defaults, an optional file and the environment.
    ///
    /// # Errors
    /// Returns `Error::Config` if a layer cannot be read or deserialized, or
    /// `Error::InvalidConfig` if the merged values fail [`validate`](Self::validate).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let host = self
            .server
            .base_url
            .strip_prefix("http://")
            .or_else(|| self.server.base_url.strip_prefix("https://"))
            .ok_or_else(|| {
                invalid(
                    "server.base_url",
                    format!("must be an http(s) URL, got '{}'", self.server.base_url),
                )
            })?;
        if host.trim_matches('/').is_empty() {
            return Err(invalid("server.base_url", "host is missing"));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(invalid("server.request_timeout_ms", "must be positive"));
        }
        if self.clock.gmt_offset_secs.abs() > MAX_GMT_OFFSET_SECS {
            return Err(invalid(
                "clock.gmt_offset_secs",
                format!("must be within ±{MAX_GMT_OFFSET_SECS}"),
            ));
        }
        if self.clock.daylight_offset_secs.abs() > MAX_DAYLIGHT_OFFSET_SECS {
            return Err(invalid(
                "clock.daylight_offset_secs",
                format!("must be within ±{MAX_DAYLIGHT_OFFSET_SECS}"),
            ));
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(invalid("timing.poll_interval_ms", "must be positive"));
        }
        if self.timing.pulse_ms == 0 {
            return Err(invalid("timing.pulse_ms", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> Error {
    Error::InvalidConfig {
        key: key.to_string(),
        reason: reason.into(),
    }
}
