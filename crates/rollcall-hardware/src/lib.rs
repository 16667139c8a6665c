//! Hardware device abstraction layer for the attendance terminal.
//!
//! This crate provides trait-based abstractions for the two peripherals of
//! the terminal, the RFID radio and the pair of feedback lines, together with
//! the small adapters the capture loop drives them through.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Device Traits
//!
//! ## RFID Readers
//!
//! The [`RfidDevice`] trait follows the ISO 14443-A polling model: check for
//! a new card, read its serial, halt it.
//!
//! ```no_run
//! use rollcall_hardware::traits::RfidDevice;
//! use rollcall_hardware::error::Result;
//!
//! async fn uid_if_present<R: RfidDevice>(reader: &mut R) -> Result<Option<String>> {
//!     if reader.is_new_card_present().await? {
//!         return Ok(Some(reader.read_card().await?.uid_hex()));
//!     }
//!     Ok(None)
//! }
//! ```
//!
//! ## Feedback Outputs
//!
//! The [`SignalOutput`] trait switches the success and failure lines.
//!
//! # Adapters
//!
//! - [`ReaderAdapter`] reduces a reader to `poll() -> Option<CredentialId>`
//!   plus `halt()`.
//! - [`FeedbackIndicator`] turns an output into fixed-length pulses.
//!
//! # Implementations
//!
//! - [`mock`]: programmable devices for tests.
//! - [`console`]: stdin reader and log indicator for bench runs.
//! - [`devices`]: enum dispatch over the above.
//!
//! [`RfidDevice`]: traits::RfidDevice
//! [`SignalOutput`]: traits::SignalOutput
//! [`ReaderAdapter`]: reader::ReaderAdapter
//! [`FeedbackIndicator`]: indicator::FeedbackIndicator
//! [`CredentialId`]: rollcall_core::CredentialId

pub mod console;
pub mod devices;
pub mod error;
pub mod indicator;
pub mod mock;
pub mod reader;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use indicator::FeedbackIndicator;
pub use reader::ReaderAdapter;
pub use traits::{CardData, CardType, MAX_UID_LENGTH, MIN_UID_LENGTH, RfidDevice, SignalOutput};
pub use types::{DeviceInfo, ReaderInfo, SignalLine};
