//! Attendance capture loop.
//!
//! Ties a credential reader, the holder directory, the attendance ledger and
//! the feedback indicator into a single sequential cycle:
//!
//! ```text
//! Idle → Reading → Resolving → Recording → Signaling → Idle
//!                      └─────────────────────↗
//! ```
//!
//! The loop halts the credential session after the feedback pulse and then
//! waits out a fixed cooldown before polling again.

pub mod capture;
pub mod state;

pub use capture::{CaptureLoop, CycleReport};
pub use state::{CaptureState, StateMachine, StateTransition};
