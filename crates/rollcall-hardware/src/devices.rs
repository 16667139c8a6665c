//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) are not object-safe,
//! so `Box<dyn RfidDevice>` is not available. These enums provide concrete
//! type dispatch instead, letting the binary pick a device at runtime while
//! the capture loop stays generic.
//!
//! # Examples
//!
//! ```
//! use rollcall_hardware::devices::AnyRfidDevice;
//! use rollcall_hardware::mock::MockRfid;
//!
//! let (reader, _handle) = MockRfid::new();
//! let any_reader = AnyRfidDevice::Mock(reader);
//! ```

use crate::console::{ConsoleIndicator, ConsoleRfid};
use crate::mock::{MockIndicator, MockRfid};
use crate::traits::{RfidDevice, SignalOutput};
use crate::{CardData, DeviceInfo, ReaderInfo, Result, SignalLine};

/// Enum wrapper for RFID reader device dispatch.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::devices::AnyRfidDevice;
/// use rollcall_hardware::traits::RfidDevice;
/// use rollcall_hardware::mock::MockRfid;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (reader, _handle) = MockRfid::new();
///     let any_reader = AnyRfidDevice::Mock(reader);
///
///     let info = any_reader.get_reader_info().await?;
///     println!("Reader: {}", info.name);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyRfidDevice {
    /// Mock reader for development and testing.
    Mock(MockRfid),

    /// Reader fed by hex lines on a text stream.
    Console(ConsoleRfid),
}

impl RfidDevice for AnyRfidDevice {
    async fn is_new_card_present(&mut self) -> Result<bool> {
        match self {
            Self::Mock(device) => device.is_new_card_present().await,
            Self::Console(device) => device.is_new_card_present().await,
        }
    }

    async fn read_card(&mut self) -> Result<CardData> {
        match self {
            Self::Mock(device) => device.read_card().await,
            Self::Console(device) => device.read_card().await,
        }
    }

    async fn halt(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.halt().await,
            Self::Console(device) => device.halt().await,
        }
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        match self {
            Self::Mock(device) => device.get_reader_info().await,
            Self::Console(device) => device.get_reader_info().await,
        }
    }
}

/// Enum wrapper for feedback output dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySignalOutput {
    /// Mock outputs for development and testing.
    Mock(MockIndicator),

    /// Outputs reported through the log.
    Console(ConsoleIndicator),
}

impl SignalOutput for AnySignalOutput {
    async fn set_line(&mut self, line: SignalLine, high: bool) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_line(line, high).await,
            Self::Console(device) => device.set_line(line, high).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
            Self::Console(device) => device.get_info().await,
        }
    }
}
