//! Model trait for abstracting the computer-use backend
//!
//! The turn loop only needs one operation: send the whole history, get the
//! next model turn back.

use async_trait::async_trait;

use crate::core::Result;
use crate::llm::content::Content;

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One model response
#[derive(Debug, Clone)]
pub struct ModelTurn {
    /// Content of the first candidate, kept verbatim for the history
    pub content: Content,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
}

impl ModelTurn {
    pub fn new(content: Content) -> Self {
        Self {
            content,
            usage: None,
        }
    }
}

/// A vision model that proposes browser actions
#[async_trait]
pub trait ComputerUseModel: Send + Sync {
    /// Generate the next turn from the full ordered history
    async fn generate(&self, history: &[Content]) -> Result<ModelTurn>;

    /// Model identifier, for logging
    fn name(&self) -> &str;
}
