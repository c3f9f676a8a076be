//! LLM module - the computer-use model backend
//!
//! Wire types for Gemini content, the model trait, and the Gemini client.

pub mod content;
pub mod gemini;
pub mod traits;

pub use content::{Blob, Content, FunctionCall, FunctionResponse, FunctionResponsePart, Part};
pub use gemini::GeminiClient;
pub use traits::{ComputerUseModel, ModelTurn, TokenUsage};
