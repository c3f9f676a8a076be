//! Turn loop state
//!
//! Tracks the turn counter and the single terminal state of a session.

use std::fmt;

/// How a session ended. Exactly one applies to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The model answered without requesting actions
    Done { text: String },
    /// The turn budget ran out
    StoppedBudget,
    /// The operator refused a flagged action
    StoppedDenied,
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Done { .. } => write!(f, "done"),
            SessionOutcome::StoppedBudget => write!(f, "reached step limit"),
            SessionOutcome::StoppedDenied => write!(f, "stopped by operator"),
        }
    }
}

/// State of the turn loop
#[derive(Debug, Clone)]
pub struct TurnState {
    /// Turns started so far
    pub turn: usize,
    /// Maximum allowed turns
    pub max_turns: usize,
    /// Set once the session reaches a terminal state
    pub outcome: Option<SessionOutcome>,
    /// Actions executed across all turns
    pub actions_executed: usize,
}

impl TurnState {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turn: 0,
            max_turns,
            outcome: None,
            actions_executed: 0,
        }
    }

    /// Check if the loop should run another turn
    pub fn should_continue(&self) -> bool {
        self.turn < self.max_turns && self.outcome.is_none()
    }

    /// Start the next turn, returning its 1-based number
    pub fn begin_turn(&mut self) -> usize {
        self.turn += 1;
        self.turn
    }

    /// Record the terminal state. The first one wins.
    pub fn finish(&mut self, outcome: SessionOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }

    /// Terminal state after the loop exits; budget exhaustion if nothing else
    pub fn into_outcome(self) -> SessionOutcome {
        self.outcome.unwrap_or(SessionOutcome::StoppedBudget)
    }
}
