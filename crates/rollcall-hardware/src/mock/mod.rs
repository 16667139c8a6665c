//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod indicator;
pub mod rfid;

// Re-export commonly used types
pub use indicator::{LevelChange, MockIndicator, MockIndicatorHandle, Pulse};
pub use rfid::{MockRfid, MockRfidHandle, ReaderOp};
