//! Capture loop.
//!
//! Drives one credential at a time through poll, lookup, ledger submission
//! and feedback. Every stage is awaited in sequence, so the reader is never
//! polled while a cycle is in flight.

use crate::state::{CaptureState, StateMachine};
use rollcall_core::config::TimingConfig;
use rollcall_core::{CredentialId, HolderRecord, Outcome, Result};
use rollcall_hardware::{FeedbackIndicator, ReaderAdapter, RfidDevice, SignalOutput};
use rollcall_network::{AttendanceLedger, HolderDirectory};
use std::time::Duration;
use tracing::{Instrument, debug, info, info_span, warn};

/// Summary of a completed capture cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Credential that started the cycle.
    pub credential: CredentialId,

    /// Holder the credential resolved to, if any.
    pub holder: Option<HolderRecord>,

    /// Cycle outcome, which picked the feedback line.
    pub outcome: Outcome,
}

/// Attendance capture loop.
///
/// Owns the reader, the two remote collections and the indicator for the
/// lifetime of the terminal.
pub struct CaptureLoop<R, D, L, O>
where
    R: RfidDevice,
    D: HolderDirectory,
    L: AttendanceLedger,
    O: SignalOutput,
{
    reader: ReaderAdapter<R>,
    directory: D,
    ledger: L,
    indicator: FeedbackIndicator<O>,
    poll_interval: Duration,
    cooldown: Duration,
    machine: StateMachine,
    cycles: u64,
}

impl<R, D, L, O> CaptureLoop<R, D, L, O>
where
    R: RfidDevice,
    D: HolderDirectory,
    L: AttendanceLedger,
    O: SignalOutput,
{
    pub fn new(
        reader: ReaderAdapter<R>,
        directory: D,
        ledger: L,
        indicator: FeedbackIndicator<O>,
        timing: &TimingConfig,
    ) -> Self {
        Self {
            reader,
            directory,
            ledger,
            indicator,
            poll_interval: timing.poll_interval(),
            cooldown: timing.cooldown(),
            machine: StateMachine::new(),
            cycles: 0,
        }
    }

    /// Run until the reader disconnects or `max_cycles` cycles complete.
    ///
    /// Returns the number of completed cycles.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the cycle order is broken.
    /// Failed lookups, submissions and output faults end the current cycle
    /// only.
    pub async fn run(&mut self, max_cycles: Option<u64>) -> Result<u64> {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            pulse_ms = self.indicator.pulse().as_millis() as u64,
            cooldown_ms = self.cooldown.as_millis() as u64,
            "Capture loop started"
        );

        let mut completed = 0;
        while max_cycles.is_none_or(|max| completed < max) {
            if self.poll_once().await?.is_some() {
                completed += 1;
                continue;
            }
            if self.reader.is_disconnected() {
                info!(completed, "Reader disconnected, stopping capture loop");
                break;
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        Ok(completed)
    }

    /// Poll the reader once and run a full cycle if a credential answers.
    ///
    /// # Errors
    ///
    /// See [`run_cycle`](Self::run_cycle).
    pub async fn poll_once(&mut self) -> Result<Option<CycleReport>> {
        match self.reader.poll().await {
            Some(credential) => self.run_cycle(credential).await.map(Some),
            None => Ok(None),
        }
    }

    /// Run a full cycle for a credential read while idle.
    ///
    /// Returns after the pulse, the session halt and the cooldown.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the loop is not idle.
    pub async fn run_cycle(&mut self, credential: CredentialId) -> Result<CycleReport> {
        self.cycles += 1;
        let span = info_span!("cycle", seq = self.cycles, credential = %credential);
        let report = self.cycle(credential).instrument(span).await?;

        if !self.cooldown.is_zero() {
            debug!(cooldown_ms = self.cooldown.as_millis() as u64, "Cooling down");
            tokio::time::sleep(self.cooldown).await;
        }
        Ok(report)
    }

    async fn cycle(&mut self, credential: CredentialId) -> Result<CycleReport> {
        self.machine.transition_to(CaptureState::Reading)?;
        info!("Credential presented");

        self.machine.transition_to(CaptureState::Resolving)?;
        let (holder, outcome) = match self.directory.resolve(&credential).await {
            Ok(holder) => {
                self.machine.transition_to(CaptureState::Recording)?;
                let outcome = match self.ledger.record(&holder).await {
                    Ok(delivery) => delivery.outcome(),
                    Err(e) => {
                        warn!(error = %e, "Ledger submission failed");
                        e.outcome()
                    }
                };
                (Some(holder), outcome)
            }
            Err(e) => {
                warn!(error = %e, "Directory lookup failed");
                (None, e.outcome())
            }
        };

        self.machine.transition_to(CaptureState::Signaling)?;
        if let Err(e) = self.indicator.signal(outcome.is_success()).await {
            warn!(error = %e, "Feedback output fault");
        }
        if let Err(e) = self.reader.halt().await {
            warn!(error = %e, "Failed to halt credential session");
        }
        self.machine.transition_to(CaptureState::Idle)?;

        info!(%outcome, "Cycle complete");
        Ok(CycleReport {
            credential,
            holder,
            outcome,
        })
    }

    pub fn state(&self) -> CaptureState {
        self.machine.current_state()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Number of cycles started since creation.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn reader(&self) -> &ReaderAdapter<R> {
        &self.reader
    }

    pub fn indicator(&self) -> &FeedbackIndicator<O> {
        &self.indicator
    }
}
