//! Mock feedback outputs for testing and development.
//!
//! Records every level change together with the (tokio) instant it happened,
//! so tests can check pulse ordering and duration under a paused clock.

use crate::{
    HardwareError, Result,
    traits::SignalOutput,
    types::{DeviceInfo, SignalLine},
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// One recorded level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub line: SignalLine,
    pub high: bool,
    pub at: Instant,
}

/// A completed high-then-low pulse on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub line: SignalLine,
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct OutputState {
    changes: Vec<LevelChange>,
    high: HashSet<SignalLine>,
    failing: bool,
    fail_next: Option<bool>,
}

fn lock(state: &Mutex<OutputState>) -> MutexGuard<'_, OutputState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock pair of feedback lines.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::mock::MockIndicator;
/// use rollcall_hardware::traits::SignalOutput;
/// use rollcall_hardware::types::SignalLine;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (mut output, handle) = MockIndicator::new();
///
///     output.set_line(SignalLine::Success, true).await?;
///     assert!(handle.is_high(SignalLine::Success));
///
///     output.set_line(SignalLine::Success, false).await?;
///     assert_eq!(handle.pulses().len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockIndicator {
    state: Arc<Mutex<OutputState>>,
}

impl MockIndicator {
    /// Create a new mock indicator and its inspection handle.
    pub fn new() -> (Self, MockIndicatorHandle) {
        let state = Arc::new(Mutex::new(OutputState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockIndicatorHandle { state },
        )
    }
}

impl SignalOutput for MockIndicator {
    async fn set_line(&mut self, line: SignalLine, high: bool) -> Result<()> {
        let mut state = lock(&self.state);

        if state.failing {
            return Err(HardwareError::output(line.to_string(), "simulated fault"));
        }
        if state.fail_next == Some(high) {
            state.fail_next = None;
            return Err(HardwareError::output(line.to_string(), "simulated glitch"));
        }

        if high {
            state.high.insert(line);
        } else {
            state.high.remove(&line);
        }
        state.changes.push(LevelChange {
            line,
            high,
            at: Instant::now(),
        });
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock Indicator", "Mock"))
    }
}

/// Handle for inspecting a mock indicator.
#[derive(Debug, Clone)]
pub struct MockIndicatorHandle {
    state: Arc<Mutex<OutputState>>,
}

impl MockIndicatorHandle {
    /// Check whether `line` is currently driven high.
    pub fn is_high(&self, line: SignalLine) -> bool {
        lock(&self.state).high.contains(&line)
    }

    /// Every level change so far.
    pub fn changes(&self) -> Vec<LevelChange> {
        lock(&self.state).changes.clone()
    }

    /// Completed pulses, pairing each rising edge with the next falling edge
    /// on the same line.
    pub fn pulses(&self) -> Vec<Pulse> {
        let changes = self.changes();
        let mut pulses = Vec::new();

        for (index, rise) in changes.iter().enumerate().filter(|(_, c)| c.high) {
            if let Some(fall) = changes[index + 1..]
                .iter()
                .find(|c| c.line == rise.line && !c.high)
            {
                pulses.push(Pulse {
                    line: rise.line,
                    duration: fall.at.duration_since(rise.at),
                });
            }
        }
        pulses
    }

    /// Lines of completed pulses, in order.
    pub fn signals(&self) -> Vec<SignalLine> {
        self.pulses().into_iter().map(|pulse| pulse.line).collect()
    }

    /// Make every following `set_line` call fail.
    pub fn set_failing(&self, failing: bool) {
        lock(&self.state).failing = failing;
    }

    /// Make only the next write driving a line to `high` fail.
    pub fn fail_next_write(&self, high: bool) {
        lock(&self.state).fail_next = Some(high);
    }

    /// Forget recorded changes.
    pub fn clear(&self) {
        lock(&self.state).changes.clear();
    }
}
