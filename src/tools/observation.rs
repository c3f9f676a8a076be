//! Post-turn observation
//!
//! One screenshot and one URL per turn, shared by every outcome of that turn.

use crate::core::Result;
use crate::llm::{Blob, Content, FunctionResponse, FunctionResponsePart, Part};
use crate::tools::browser::BrowserPage;
use crate::tools::executor::ActionOutcome;

/// What the model sees after a turn's actions
#[derive(Debug, Clone)]
pub struct Observation {
    pub screenshot: Vec<u8>,
    pub url: String,
    pub outcomes: Vec<ActionOutcome>,
}

impl Observation {
    /// Capture the page state after the whole batch
    pub fn capture(page: &mut dyn BrowserPage, outcomes: Vec<ActionOutcome>) -> Result<Self> {
        let screenshot = page.screenshot_png()?;
        let url = page.url()?;
        log::debug!(
            "Observed {} ({} bytes of screenshot, {} outcome(s))",
            url,
            screenshot.len(),
            outcomes.len()
        );
        Ok(Self {
            screenshot,
            url,
            outcomes,
        })
    }

    /// One function response per outcome, in outcome order
    pub fn function_responses(&self) -> Vec<FunctionResponse> {
        let image = Blob::png(&self.screenshot);
        self.outcomes
            .iter()
            .map(|outcome| FunctionResponse {
                id: outcome.call_id.clone(),
                name: outcome.name.clone(),
                response: outcome.response_fields(&self.url),
                parts: vec![FunctionResponsePart {
                    inline_data: image.clone(),
                }],
            })
            .collect()
    }

    /// The user turn that answers the model's function calls
    pub fn into_content(self) -> Content {
        Content::user(
            self.function_responses()
                .into_iter()
                .map(Part::function_response)
                .collect(),
        )
    }
}
