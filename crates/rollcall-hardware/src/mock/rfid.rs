//! Mock RFID reader implementation for testing and development.
//!
//! This module provides a simulated radio that can be controlled
//! programmatically for testing without requiring physical hardware. It
//! follows the ISO 14443-A halt semantics: a halted card stays silent until
//! it is removed from the field and presented again.

use crate::{
    HardwareError, Result,
    traits::{CardData, CardType, RfidDevice},
    types::ReaderInfo,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Operation performed on the mock reader, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderOp {
    /// `is_new_card_present` was called.
    Poll,

    /// `read_card` was called.
    Read,

    /// `halt` was called.
    Halt,
}

#[derive(Debug)]
struct CardInField {
    card: CardData,
    halted: bool,
}

#[derive(Debug, Default)]
struct FieldState {
    cards: HashMap<Vec<u8>, CardType>,
    in_field: Option<CardInField>,
    pending_failure: Option<String>,
    operations: Vec<ReaderOp>,
}

fn lock(state: &Mutex<FieldState>) -> MutexGuard<'_, FieldState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock RFID reader for testing and development.
///
/// The reader and its [`MockRfidHandle`] share one simulated antenna field.
/// The handle places registered cards in the field; the reader sees them
/// through the [`RfidDevice`] polling interface.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::mock::MockRfid;
/// use rollcall_hardware::traits::{RfidDevice, CardType};
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (mut reader, handle) = MockRfid::new();
///
///     let card_uid = vec![0x04, 0xAB, 0xCD, 0xEF];
///     handle.add_card(card_uid.clone(), CardType::MifareClassic1K);
///     handle.present_card(card_uid)?;
///
///     assert!(reader.is_new_card_present().await?);
///     let card = reader.read_card().await?;
///     assert_eq!(card.uid_hex(), "04ABCDEF");
///
///     reader.halt().await?;
///     assert!(!reader.is_new_card_present().await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRfid {
    state: Arc<Mutex<FieldState>>,
    name: String,
}

impl MockRfid {
    /// Create a new mock RFID reader with the default name.
    pub fn new() -> (Self, MockRfidHandle) {
        Self::with_name("Mock RFID Reader".to_string())
    }

    /// Create a new mock RFID reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockRfidHandle) {
        let state = Arc::new(Mutex::new(FieldState::default()));

        let reader = Self {
            state: Arc::clone(&state),
            name: name.clone(),
        };
        let handle = MockRfidHandle { state, name };

        (reader, handle)
    }
}

impl RfidDevice for MockRfid {
    async fn is_new_card_present(&mut self) -> Result<bool> {
        let mut state = lock(&self.state);
        state.operations.push(ReaderOp::Poll);

        if let Some(message) = state.pending_failure.take() {
            return Err(HardwareError::communication(message));
        }

        Ok(state.in_field.as_ref().is_some_and(|field| !field.halted))
    }

    async fn read_card(&mut self) -> Result<CardData> {
        let mut state = lock(&self.state);
        state.operations.push(ReaderOp::Read);

        match &state.in_field {
            Some(field) if !field.halted => Ok(field.card.clone()),
            _ => Err(HardwareError::card_read("No card answered the select")),
        }
    }

    async fn halt(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.operations.push(ReaderOp::Halt);

        if let Some(field) = state.in_field.as_mut() {
            field.halted = true;
        }
        Ok(())
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        Ok(ReaderInfo::new(self.name.clone(), vec!["ISO14443A".to_string()])
            .with_max_baud_rate(848000))
    }
}

/// Handle for controlling a mock RFID reader.
///
/// Clones share the same field, card database and operation journal.
#[derive(Debug, Clone)]
pub struct MockRfidHandle {
    state: Arc<Mutex<FieldState>>,
    name: String,
}

impl MockRfidHandle {
    /// Register a card that can later be presented to the reader.
    pub fn add_card(&self, uid: Vec<u8>, card_type: CardType) {
        lock(&self.state).cards.insert(uid, card_type);
    }

    /// Place a registered card in the field, replacing any card already there.
    ///
    /// # Errors
    ///
    /// Returns an error if the card UID is not in the database or has an
    /// invalid length.
    pub fn present_card(&self, uid: Vec<u8>) -> Result<()> {
        let mut state = lock(&self.state);

        let card_type = state
            .cards
            .get(&uid)
            .cloned()
            .ok_or_else(|| HardwareError::invalid_data(format!("Card {uid:02X?} not in database")))?;

        let card = CardData::new(uid, card_type)?;
        state.in_field = Some(CardInField {
            card,
            halted: false,
        });

        Ok(())
    }

    /// Remove the current card from the field.
    pub fn remove_card(&self) {
        lock(&self.state).in_field = None;
    }

    /// Make the next poll fail with a communication error.
    pub fn fail_next_poll(&self, message: impl Into<String>) {
        lock(&self.state).pending_failure = Some(message.into());
    }

    /// Check if a card is currently in the field.
    pub fn is_card_presented(&self) -> bool {
        lock(&self.state).in_field.is_some()
    }

    /// Check if the card in the field has been halted.
    pub fn is_card_halted(&self) -> bool {
        lock(&self.state)
            .in_field
            .as_ref()
            .is_some_and(|field| field.halted)
    }

    /// Get the UID of the card in the field, if any.
    pub fn current_card_uid(&self) -> Option<Vec<u8>> {
        lock(&self.state)
            .in_field
            .as_ref()
            .map(|field| field.card.uid.clone())
    }

    /// Operations performed on the reader so far, in call order.
    pub fn operations(&self) -> Vec<ReaderOp> {
        lock(&self.state).operations.clone()
    }

    /// Forget recorded operations.
    pub fn clear_operations(&self) {
        lock(&self.state).operations.clear();
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of cards in the database.
    pub fn card_count(&self) -> usize {
        lock(&self.state).cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UID: [u8; 4] = [0x04, 0xAB, 0xCD, 0xEF];

    fn reader_with_card() -> (MockRfid, MockRfidHandle) {
        let (reader, handle) = MockRfid::new();
        handle.add_card(UID.to_vec(), CardType::MifareClassic1K);
        (reader, handle)
    }

    #[tokio::test]
    async fn test_mock_rfid_empty_field() {
        let (mut reader, _handle) = MockRfid::new();
        assert!(!reader.is_new_card_present().await.unwrap());
        assert!(reader.read_card().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_rfid_present_and_read() {
        let (mut reader, handle) = reader_with_card();
        handle.present_card(UID.to_vec()).unwrap();

        assert!(reader.is_new_card_present().await.unwrap());
        let card = reader.read_card().await.unwrap();
        assert_eq!(card.uid_hex(), "04ABCDEF");
        assert_eq!(card.card_type, CardType::MifareClassic1K);
    }

    #[tokio::test]
    async fn test_mock_rfid_halted_card_stays_silent() {
        let (mut reader, handle) = reader_with_card();
        handle.present_card(UID.to_vec()).unwrap();

        reader.read_card().await.unwrap();
        reader.halt().await.unwrap();

        assert!(handle.is_card_halted());
        assert!(!reader.is_new_card_present().await.unwrap());
        assert!(reader.read_card().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_rfid_represented_card_answers_again() {
        let (mut reader, handle) = reader_with_card();
        handle.present_card(UID.to_vec()).unwrap();
        reader.halt().await.unwrap();

        handle.remove_card();
        assert!(!handle.is_card_presented());

        handle.present_card(UID.to_vec()).unwrap();
        assert!(reader.is_new_card_present().await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_rfid_unknown_card() {
        let (_reader, handle) = MockRfid::new();
        let result = handle.present_card(vec![0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_rfid_injected_poll_failure() {
        let (mut reader, handle) = reader_with_card();
        handle.present_card(UID.to_vec()).unwrap();
        handle.fail_next_poll("CRC error");

        let err = reader.is_new_card_present().await.unwrap_err();
        assert!(matches!(err, HardwareError::CommunicationError { .. }));
        assert!(reader.is_new_card_present().await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_rfid_operation_journal() {
        let (mut reader, handle) = reader_with_card();
        handle.present_card(UID.to_vec()).unwrap();

        reader.is_new_card_present().await.unwrap();
        reader.read_card().await.unwrap();
        reader.halt().await.unwrap();

        assert_eq!(
            handle.operations(),
            vec![ReaderOp::Poll, ReaderOp::Read, ReaderOp::Halt]
        );

        handle.clear_operations();
        assert!(handle.operations().is_empty());
    }

    #[tokio::test]
    async fn test_mock_rfid_get_reader_info() {
        let (reader, handle) = MockRfid::with_name("Bench Reader".to_string());

        let info = reader.get_reader_info().await.unwrap();
        assert_eq!(info.name, "Bench Reader");
        assert_eq!(handle.name(), "Bench Reader");
        assert!(info.protocols.contains(&"ISO14443A".to_string()));
    }

    #[tokio::test]
    async fn test_mock_rfid_handle_clone_shares_field() {
        let (_reader, handle) = reader_with_card();
        let other = handle.clone();

        other.add_card(vec![0x01, 0x02, 0x03, 0x04], CardType::MifareUltralight);
        assert_eq!(handle.card_count(), 2);

        other.present_card(UID.to_vec()).unwrap();
        assert_eq!(handle.current_card_uid(), Some(UID.to_vec()));
    }
}
