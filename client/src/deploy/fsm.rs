//! Finite state machine for post-deployment validation

use serde::{Deserialize, Serialize};

/// Validation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    /// Package uploaded, validation not decided yet
    Pending,

    /// Validation disabled by the caller
    Skipped,

    /// Remote check in progress
    Validating,

    /// Remote value matched
    Passed,

    /// Remote value did not match
    Failed,
}

/// Validation event
#[derive(Debug, Clone)]
pub enum ValidationEvent {
    /// Validation disabled
    Skip,

    /// Start the remote check
    Start,

    /// Remote value matched the expected value
    Matched,

    /// Remote value differed
    Mismatched(String),
}

/// Validation FSM
#[derive(Debug, Clone)]
pub struct ValidationFsm {
    state: ValidationState,
    error: Option<String>,
}

impl ValidationFsm {
    /// Create a new FSM in pending state
    pub fn new() -> Self {
        Self {
            state: ValidationState::Pending,
            error: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            ValidationState::Skipped | ValidationState::Passed | ValidationState::Failed
        )
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: ValidationEvent) -> Result<(), String> {
        let new_state = match (&self.state, &event) {
            (ValidationState::Pending, ValidationEvent::Skip) => ValidationState::Skipped,
            (ValidationState::Pending, ValidationEvent::Start) => ValidationState::Validating,

            (ValidationState::Validating, ValidationEvent::Matched) => ValidationState::Passed,
            (ValidationState::Validating, ValidationEvent::Mismatched(err)) => {
                self.error = Some(err.clone());
                ValidationState::Failed
            }

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for ValidationFsm {
    fn default() -> Self {
        Self::new()
    }
}
