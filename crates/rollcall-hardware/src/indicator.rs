//! Feedback indicator.
//!
//! Pulses one of the two output lines for a fixed duration per cycle. The
//! call holds the caller for the whole pulse; the capture loop relies on
//! that to keep one cycle in flight at a time.

use crate::error::Result;
use crate::traits::SignalOutput;
use crate::types::SignalLine;
use std::time::Duration;
use tracing::{debug, warn};

/// Drives the success and failure lines with fixed-length pulses.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rollcall_hardware::indicator::FeedbackIndicator;
/// use rollcall_hardware::mock::MockIndicator;
/// use rollcall_hardware::types::SignalLine;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (output, handle) = MockIndicator::new();
///     let mut indicator = FeedbackIndicator::new(output, Duration::from_millis(5));
///
///     indicator.signal(true).await?;
///     assert_eq!(handle.signals(), vec![SignalLine::Success]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FeedbackIndicator<O: SignalOutput> {
    output: O,
    pulse: Duration,
}

impl<O: SignalOutput> FeedbackIndicator<O> {
    pub fn new(output: O, pulse: Duration) -> Self {
        Self { output, pulse }
    }

    /// Drive both lines low.
    ///
    /// # Errors
    ///
    /// Returns the output error of the first line that cannot be driven.
    pub async fn reset(&mut self) -> Result<()> {
        for line in SignalLine::ALL {
            self.output.set_line(line, false).await?;
        }
        Ok(())
    }

    /// Pulse the success line if `ok`, the failure line otherwise.
    ///
    /// Returns once the line is low again. The line is driven low even when
    /// raising it failed, and a failed low write is retried once.
    ///
    /// # Errors
    ///
    /// Returns the output error if the line cannot be raised or lowered.
    pub async fn signal(&mut self, ok: bool) -> Result<()> {
        let line = SignalLine::for_result(ok);
        debug!(%line, pulse_ms = self.pulse.as_millis() as u64, "Signaling");

        let raised = self.output.set_line(line, true).await;
        match &raised {
            Ok(()) => tokio::time::sleep(self.pulse).await,
            Err(e) => warn!(%line, error = %e, "Failed to raise output"),
        }

        let lowered = self.lower(line).await;
        raised.and(lowered)
    }

    async fn lower(&mut self, line: SignalLine) -> Result<()> {
        if let Err(e) = self.output.set_line(line, false).await {
            warn!(%line, error = %e, "Failed to lower output, retrying");
            return self.output.set_line(line, false).await;
        }
        Ok(())
    }

    /// Pulse duration.
    pub fn pulse(&self) -> Duration {
        self.pulse
    }

    /// Access the wrapped output device.
    pub fn output(&self) -> &O {
        &self.output
    }
}
