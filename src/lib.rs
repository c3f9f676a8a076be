//! browser-pilot - a computer-use agent for a real browser
//!
//! Hands a natural-language goal to a Gemini computer-use model, executes the
//! UI actions it proposes in Chrome, and reports the result back as
//! screenshots until the model declares the goal done.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, credentials and error handling
//! - **LLM**: Gemini wire content and the computer-use model client
//! - **Tools**: Action parsing, coordinate mapping, the safety gate, the
//!   executor and the Chrome page
//! - **Agent**: The turn loop and conversation history
//!
//! # Usage
//!
//! ```rust,no_run
//! use browser_pilot::{
//!     load_api_key, ChromeSession, Config, GeminiClient, Goal, TerminalConfirmer,
//!     TurnOrchestrator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> browser_pilot::Result<()> {
//!     let config = Config::load()?;
//!     let api_key = load_api_key(&config.model.api_key_file)?;
//!     let model = GeminiClient::from_config(&config, api_key)?;
//!     let mut session = ChromeSession::launch(&config)?;
//!     let mut confirmer = TerminalConfirmer::stdin();
//!
//!     let goal = Goal::from_words(["Find the weather in Paris"]).expect("non-empty goal");
//!     let report = TurnOrchestrator::new(&model, &mut session, &mut confirmer, &config)
//!         .run(&goal)
//!         .await?;
//!     println!("{}", report.outcome);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::{SessionOutcome, SessionReport, TurnOrchestrator};
pub use core::{load_api_key, Config, Goal, PilotError, Result};
pub use llm::{ComputerUseModel, GeminiClient};
pub use tools::{BrowserPage, ChromeSession, Confirmer, TerminalConfirmer};
