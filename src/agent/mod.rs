//! Agent module - the turn loop and its state
//!
//! Coordinates the model, the executor and the conversation history.

pub mod conversation;
pub mod loop_state;
pub mod orchestrator;

pub use conversation::ConversationHistory;
pub use loop_state::{SessionOutcome, TurnState};
pub use orchestrator::{SessionReport, TurnOrchestrator};
