//! Hardware device trait definitions.
//!
//! This module defines the contract between the capture loop and its
//! peripherals: the RFID radio and the two feedback output lines. Mock,
//! console and real implementations are interchangeable behind these traits.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::{HardwareError, Result};
use crate::types::{DeviceInfo, ReaderInfo, SignalLine};
use rollcall_core::CredentialId;

/// RFID card type identification.
///
/// Identifies the type of RFID/NFC card that was read, as reported by the
/// SAK byte during selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardType {
    /// Mifare Classic 1K (1024 bytes).
    MifareClassic1K,

    /// Mifare Classic 4K (4096 bytes).
    MifareClassic4K,

    /// Mifare Ultralight (64 bytes).
    MifareUltralight,

    /// Unknown card type with the raw SAK byte.
    Unknown(u8),
}

impl CardType {
    /// Get a human-readable name for the card type.
    pub fn name(&self) -> &str {
        match self {
            Self::MifareClassic1K => "Mifare Classic 1K",
            Self::MifareClassic4K => "Mifare Classic 4K",
            Self::MifareUltralight => "Mifare Ultralight",
            Self::Unknown(_) => "Unknown",
        }
    }

}

/// Minimum UID length in bytes (single-size UID per ISO 14443-3).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (triple-size UID per ISO 14443-3).
pub const MAX_UID_LENGTH: usize = 10;

/// RFID card data.
///
/// Contains the identifier bytes of a card read by the radio, its type and
/// when it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardData {
    /// Card unique identifier (4-10 bytes).
    pub uid: Vec<u8>,

    /// Card type identification.
    pub card_type: CardType,

    /// Timestamp when the card was read.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl CardData {
    /// Create new card data with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID length is not within the valid range
    /// of 4-10 bytes as specified by ISO 14443.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_hardware::traits::{CardData, CardType};
    ///
    /// let card = CardData::new(vec![0x04, 0xAB, 0xCD, 0xEF], CardType::MifareClassic1K).unwrap();
    /// assert_eq!(card.uid_hex(), "04ABCDEF");
    ///
    /// assert!(CardData::new(vec![0x01, 0x02], CardType::MifareClassic1K).is_err());
    /// ```
    pub fn new(uid: Vec<u8>, card_type: CardType) -> Result<Self> {
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid.len()) {
            return Err(HardwareError::invalid_data(format!(
                "UID must be {}-{} bytes, got {}",
                MIN_UID_LENGTH,
                MAX_UID_LENGTH,
                uid.len()
            )));
        }

        Ok(Self {
            uid,
            card_type,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Get the UID as an uppercase hexadecimal string.
    pub fn uid_hex(&self) -> String {
        rollcall_core::canonicalize(&self.uid)
    }

    /// Canonical credential identifier for this card.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID is empty.
    pub fn credential_id(&self) -> Result<CredentialId> {
        Ok(CredentialId::from_bytes(&self.uid)?)
    }
}

/// RFID radio abstraction.
///
/// Mirrors the polling model of ISO 14443-A front ends such as the MFRC522:
/// the caller asks whether a new card answers in the field, selects it to
/// read its serial, and halts it once done so it stays silent until it
/// leaves and re-enters the field.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or the enum wrapper from the
/// [`devices`](crate::devices) module when the concrete device is chosen at
/// runtime.
///
/// # Examples
///
/// ```no_run
/// use rollcall_hardware::traits::RfidDevice;
/// use rollcall_hardware::error::Result;
///
/// async fn read_once<R: RfidDevice>(reader: &mut R) -> Result<Option<String>> {
///     if !reader.is_new_card_present().await? {
///         return Ok(None);
///     }
///     let card = reader.read_card().await?;
///     reader.halt().await?;
///     Ok(Some(card.uid_hex()))
/// }
/// ```
pub trait RfidDevice: Send + Sync {
    /// Check, without blocking, whether a card not yet halted answers in the field.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    async fn is_new_card_present(&mut self) -> Result<bool>;

    /// Select the card in the field and read its serial.
    ///
    /// # Errors
    ///
    /// Returns an error if no card answers, the selection fails, or the
    /// returned UID is malformed.
    async fn read_card(&mut self) -> Result<CardData>;

    /// Halt the selected card and end the authenticated session.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs.
    async fn halt(&mut self) -> Result<()>;

    /// Get reader information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// reader information.
    async fn get_reader_info(&self) -> Result<ReaderInfo>;
}

/// Feedback output abstraction.
///
/// Drives the two binary lines of the terminal. The device only switches
/// levels; pulse timing belongs to
/// [`FeedbackIndicator`](crate::indicator::FeedbackIndicator).
pub trait SignalOutput: Send + Sync {
    /// Drive `line` high (`true`) or low (`false`).
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be driven.
    async fn set_line(&mut self, line: SignalLine, high: bool) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs.
    async fn get_info(&self) -> Result<DeviceInfo>;
}
