//! Credential reader adapter.
//!
//! Wraps an [`RfidDevice`] and reduces its select/read protocol to a single
//! non-blocking question: is there a new credential, and if so what is its
//! canonical identifier? Driver errors never escape a poll; they are logged
//! and reported as "nothing present".

use crate::error::{HardwareError, Result};
use crate::traits::RfidDevice;
use crate::types::ReaderInfo;
use rollcall_core::CredentialId;
use tracing::{debug, trace, warn};

/// Adapter turning radio reads into canonical credential identifiers.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::mock::MockRfid;
/// use rollcall_hardware::reader::ReaderAdapter;
/// use rollcall_hardware::traits::CardType;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (reader, handle) = MockRfid::new();
///     let mut adapter = ReaderAdapter::new(reader);
///
///     assert_eq!(adapter.poll().await, None);
///
///     handle.add_card(vec![0xDE, 0xAD, 0xBE, 0xEF], CardType::MifareClassic1K);
///     handle.present_card(vec![0xDE, 0xAD, 0xBE, 0xEF])?;
///
///     let id = adapter.poll().await.unwrap();
///     assert_eq!(id.as_str(), "DEADBEEF");
///
///     adapter.halt().await?;
///     assert_eq!(adapter.poll().await, None);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ReaderAdapter<R: RfidDevice> {
    device: R,
    disconnected: bool,
}

impl<R: RfidDevice> ReaderAdapter<R> {
    pub fn new(device: R) -> Self {
        Self {
            device,
            disconnected: false,
        }
    }

    /// Poll the radio once.
    ///
    /// Returns immediately with `None` when no new credential answers.
    /// Pacing between polls is the caller's job.
    pub async fn poll(&mut self) -> Option<CredentialId> {
        match self.device.is_new_card_present().await {
            Ok(true) => {}
            Ok(false) => {
                self.disconnected = false;
                return None;
            }
            Err(e) => {
                self.note_error("presence check", &e);
                return None;
            }
        }
        self.disconnected = false;

        let card = match self.device.read_card().await {
            Ok(card) => card,
            Err(e) => {
                self.note_error("serial read", &e);
                return None;
            }
        };

        match card.credential_id() {
            Ok(id) => {
                debug!(
                    credential = %id,
                    card_type = card.card_type.name(),
                    read_at = %card.timestamp,
                    "Credential read"
                );
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable credential");
                None
            }
        }
    }

    /// Halt the current credential session so the same card is not re-read
    /// while it stays in the field.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the halt command fails.
    pub async fn halt(&mut self) -> Result<()> {
        trace!("Halting credential session");
        self.device.halt().await
    }

    /// Returns `true` if the last poll found the device disconnected.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Get reader information from the wrapped device.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the query fails.
    pub async fn reader_info(&self) -> Result<ReaderInfo> {
        self.device.get_reader_info().await
    }

    /// Access the wrapped device.
    pub fn device(&self) -> &R {
        &self.device
    }

    /// Consume the adapter, returning the wrapped device.
    pub fn into_inner(self) -> R {
        self.device
    }

    fn note_error(&mut self, stage: &str, error: &HardwareError) {
        if matches!(error, HardwareError::Disconnected { .. }) {
            if !self.disconnected {
                warn!(stage, error = %error, "Reader disconnected");
            }
            self.disconnected = true;
        } else {
            warn!(stage, error = %error, "Reader poll failed");
        }
    }
}
