//! Tools module - everything between a model function call and the browser
//!
//! Parsing, coordinate mapping, the safety gate, execution and observation.

pub mod action;
pub mod browser;
pub mod coords;
pub mod executor;
pub mod keys;
pub mod observation;
pub mod safety;

pub use action::{Action, ActionRequest, SafetyDecision, ScrollDirection};
pub use browser::{BrowserPage, ChromeSession, PageResult};
pub use coords::CoordinateMapper;
pub use executor::{ActionExecutor, ActionOutcome, ExecutorSettings, TurnExecution};
pub use keys::{KeyChord, Modifier};
pub use observation::Observation;
pub use safety::{Confirmer, GateDecision, SafetyGate, TerminalConfirmer};
