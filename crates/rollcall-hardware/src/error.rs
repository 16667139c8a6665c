//! Error types for hardware operations.
//!
//! This module defines error types specific to the reader and the feedback
//! outputs, covering disconnection, radio communication faults, unreadable
//! cards and output faults.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Card reading error.
    #[error("Card read error: {message}")]
    CardReadError { message: String },

    /// Output line could not be driven.
    #[error("Output error on {line}: {message}")]
    OutputError { line: String, message: String },
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new card read error.
    pub fn card_read(message: impl Into<String>) -> Self {
        Self::CardReadError {
            message: message.into(),
        }
    }

    /// Create a new output error for the named line.
    pub fn output(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutputError {
            line: line.into(),
            message: message.into(),
        }
    }}

impl From<rollcall_core::Error> for HardwareError {
    fn from(err: rollcall_core::Error) -> Self {
        Self::InvalidData {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("MFRC522");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: MFRC522");
    }

    #[test]
    fn test_card_read_error() {
        let error = HardwareError::card_read("Collision during anticollision loop");
        assert!(matches!(error, HardwareError::CardReadError { .. }));
        assert_eq!(
            error.to_string(),
            "Card read error: Collision during anticollision loop"
        );
    }

    #[test]
    fn test_output_error() {
        let error = HardwareError::output("success", "pin busy");
        assert_eq!(error.to_string(), "Output error on success: pin busy");
    }

    #[test]
    fn test_from_core_error() {
        let core = rollcall_core::Error::InvalidCredential("Empty identifier".to_string());
        let error: HardwareError = core.into();
        assert!(matches!(error, HardwareError::InvalidData { .. }));
        assert!(error.to_string().contains("Empty identifier"));
    }
}
