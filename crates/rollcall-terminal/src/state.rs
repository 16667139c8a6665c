//! Capture cycle state machine.
//!
//! # States
//!
//! - `Idle`: polling the reader for a new credential
//! - `Reading`: a credential answered and its identifier was read
//! - `Resolving`: looking the credential up in the directory
//! - `Recording`: submitting the attendance event to the ledger
//! - `Signaling`: pulsing the feedback line, then halting the session
//!
//! # Valid Transitions
//!
//! - Idle → Reading → Resolving → Recording → Signaling → Idle
//! - Resolving → Signaling (unknown credential or failed lookup)
//!
//! There is no timeout or cancellation path: every entered state runs to
//! completion.
//!
//! # Examples
//!
//! ```
//! use rollcall_terminal::{CaptureState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), CaptureState::Idle);
//!
//! machine.transition_to(CaptureState::Reading).unwrap();
//! assert!(machine.transition_to(CaptureState::Recording).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;

use rollcall_core::{Error, Result};

/// Maximum number of state transitions kept in history.
///
/// A full cycle records five transitions, so this covers the last 20 cycles.
const MAX_HISTORY_SIZE: usize = 100;

/// Phase of the capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureState {
    /// Polling the reader.
    Idle,

    /// Credential identifier read.
    Reading,

    /// Directory lookup in progress.
    Resolving,

    /// Ledger submission in progress.
    Recording,

    /// Feedback pulse in progress.
    Signaling,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            CaptureState::Idle => "Idle",
            CaptureState::Reading => "Reading",
            CaptureState::Resolving => "Resolving",
            CaptureState::Recording => "Recording",
            CaptureState::Signaling => "Signaling",
        };
        write!(f, "{}", state_str)
    }
}

impl CaptureState {
    /// Check if transition to `target` is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_terminal::CaptureState;
    ///
    /// assert!(CaptureState::Resolving.can_transition_to(CaptureState::Signaling));
    /// assert!(!CaptureState::Idle.can_transition_to(CaptureState::Resolving));
    /// ```
    pub fn can_transition_to(self, target: CaptureState) -> bool {
        matches!(
            (self, target),
            (CaptureState::Idle, CaptureState::Reading)
                | (CaptureState::Reading, CaptureState::Resolving)
                | (
                    CaptureState::Resolving,
                    CaptureState::Recording | CaptureState::Signaling
                )
                | (CaptureState::Recording, CaptureState::Signaling)
                | (CaptureState::Signaling, CaptureState::Idle)
        )
    }
}

/// A single state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: CaptureState,
    pub to: CaptureState,
}

/// State machine enforcing the capture cycle order.
///
/// Not thread-safe; the capture loop owns it exclusively.
#[derive(Debug)]
pub struct StateMachine {
    current_state: CaptureState,
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the `Idle` state.
    pub fn new() -> Self {
        Self {
            current_state: CaptureState::Idle,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> CaptureState {
        self.current_state
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to `new_state`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the cycle order does not
    /// allow the move; the machine is left unchanged.
    pub fn transition_to(&mut self, new_state: CaptureState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition {
            from: self.current_state,
            to: new_state,
        };
        self.current_state = new_state;

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn path(machine: &StateMachine) -> Vec<CaptureState> {
        machine.history().iter().map(|t| t.to).collect()
    }

    #[test]
    fn test_new_machine_starts_idle() {
        let machine = StateMachine::new();
        assert_eq!(machine.current_state(), CaptureState::Idle);
        assert!(machine.history().is_empty());
    }

    #[rstest]
    #[case(CaptureState::Idle, CaptureState::Reading, true)]
    #[case(CaptureState::Reading, CaptureState::Resolving, true)]
    #[case(CaptureState::Resolving, CaptureState::Recording, true)]
    #[case(CaptureState::Resolving, CaptureState::Signaling, true)]
    #[case(CaptureState::Recording, CaptureState::Signaling, true)]
    #[case(CaptureState::Signaling, CaptureState::Idle, true)]
    #[case(CaptureState::Idle, CaptureState::Resolving, false)]
    #[case(CaptureState::Idle, CaptureState::Signaling, false)]
    #[case(CaptureState::Reading, CaptureState::Idle, false)]
    #[case(CaptureState::Resolving, CaptureState::Idle, false)]
    #[case(CaptureState::Recording, CaptureState::Idle, false)]
    #[case(CaptureState::Signaling, CaptureState::Reading, false)]
    #[case(CaptureState::Idle, CaptureState::Idle, false)]
    fn test_transition_table(
        #[case] from: CaptureState,
        #[case] to: CaptureState,
        #[case] valid: bool,
    ) {
        assert_eq!(from.can_transition_to(to), valid);
    }

    #[test]
    fn test_recorded_cycle() {
        let mut machine = StateMachine::new();
        for state in [
            CaptureState::Reading,
            CaptureState::Resolving,
            CaptureState::Recording,
            CaptureState::Signaling,
            CaptureState::Idle,
        ] {
            machine.transition_to(state).unwrap();
        }

        assert_eq!(
            path(&machine),
            vec![
                CaptureState::Reading,
                CaptureState::Resolving,
                CaptureState::Recording,
                CaptureState::Signaling,
                CaptureState::Idle,
            ]
        );
    }

    #[test]
    fn test_failed_lookup_skips_recording() {
        let mut machine = StateMachine::new();
        machine.transition_to(CaptureState::Reading).unwrap();
        machine.transition_to(CaptureState::Resolving).unwrap();
        machine.transition_to(CaptureState::Signaling).unwrap();
        machine.transition_to(CaptureState::Idle).unwrap();

        assert_eq!(machine.current_state(), CaptureState::Idle);
        assert_eq!(machine.history().len(), 4);
    }

    #[test]
    fn test_invalid_transition_leaves_state() {
        let mut machine = StateMachine::new();
        let err = machine.transition_to(CaptureState::Recording).unwrap_err();

        assert!(matches!(err, Error::InvalidStateTransition { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid state transition from Idle to Recording"
        );
        assert_eq!(machine.current_state(), CaptureState::Idle);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut machine = StateMachine::new();
        for _ in 0..30 {
            machine.transition_to(CaptureState::Reading).unwrap();
            machine.transition_to(CaptureState::Resolving).unwrap();
            machine.transition_to(CaptureState::Signaling).unwrap();
            machine.transition_to(CaptureState::Idle).unwrap();
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        assert_eq!(
            machine.history().back(),
            Some(&StateTransition {
                from: CaptureState::Signaling,
                to: CaptureState::Idle,
            })
        );
    }
}
