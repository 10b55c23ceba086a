//! Finite State Machine for deployment convergence tracking

use serde::{Deserialize, Serialize};

/// Tracker state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerState {
    /// Deployment still listed, deadline not reached
    Polling,

    /// Deployment no longer listed
    Converged,

    /// Deadline passed while the deployment was still listed
    TimedOut,

    /// The deployment list could not be fetched
    Unreachable(String),
}

impl TrackerState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrackerState::Polling)
    }
}

/// Tracker event
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// One successful poll of the deployment list
    Observed { present: bool, deadline_passed: bool },

    /// The deployment list fetch failed
    FetchFailed(String),
}

/// Tracker FSM
#[derive(Debug, Clone)]
pub struct TrackerFsm {
    state: TrackerState,
    polls: u32,
}

impl TrackerFsm {
    /// Create a new FSM in polling state
    pub fn new() -> Self {
        Self {
            state: TrackerState::Polling,
            polls: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Number of events processed
    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn into_state(self) -> TrackerState {
        self.state
    }

    /// Process an event and transition state
    ///
    /// Absence is checked before the deadline, so a deployment that vanished
    /// on the last poll converges even when time is also up.
    pub fn process(&mut self, event: TrackerEvent) -> Result<(), String> {
        let new_state = match (&self.state, &event) {
            (TrackerState::Polling, TrackerEvent::Observed { present: false, .. }) => {
                TrackerState::Converged
            }
            (TrackerState::Polling, TrackerEvent::Observed { deadline_passed: true, .. }) => {
                TrackerState::TimedOut
            }
            (TrackerState::Polling, TrackerEvent::Observed { .. }) => TrackerState::Polling,
            (TrackerState::Polling, TrackerEvent::FetchFailed(reason)) => {
                TrackerState::Unreachable(reason.clone())
            }

            // Terminal states
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.polls += 1;
        self.state = new_state;
        Ok(())
    }
}

impl Default for TrackerFsm {
    fn default() -> Self {
        Self::new()
    }
}
