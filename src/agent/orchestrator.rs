//! Turn orchestrator
//!
//! Drives the request → execute → observe cycle. Each turn sends the whole
//! history to the model, runs the actions it asks for, and answers with a
//! single observation. The loop ends when the model replies without actions,
//! when the operator denies a flagged action, or when the turn budget is
//! spent.

use crate::agent::conversation::ConversationHistory;
use crate::agent::loop_state::{SessionOutcome, TurnState};
use crate::core::{Config, Goal, Result};
use crate::llm::{ComputerUseModel, Content, Part};
use crate::tools::{
    executor::USER_DENIED, ActionExecutor, ActionRequest, BrowserPage, Confirmer, Observation,
    SafetyGate,
};

/// Summary of a finished session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    /// Turns started, including the final one
    pub turns: usize,
    /// Actions that went through the executor
    pub actions_executed: usize,
    pub history: ConversationHistory,
}

pub struct TurnOrchestrator<'a> {
    model: &'a dyn ComputerUseModel,
    page: &'a mut dyn BrowserPage,
    confirmer: &'a mut dyn Confirmer,
    executor: ActionExecutor,
    max_turns: usize,
    start_url: Option<String>,
}

impl<'a> TurnOrchestrator<'a> {
    pub fn new(
        model: &'a dyn ComputerUseModel,
        page: &'a mut dyn BrowserPage,
        confirmer: &'a mut dyn Confirmer,
        config: &Config,
    ) -> Self {
        Self {
            model,
            page,
            confirmer,
            executor: ActionExecutor::from_config(config),
            max_turns: config.agent.max_turns,
            start_url: Some(config.browser.start_url.clone()),
        }
    }

    pub fn with_executor(mut self, executor: ActionExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Page to load before the first screenshot; `None` keeps the current page
    pub fn with_start_url(mut self, start_url: Option<String>) -> Self {
        self.start_url = start_url;
        self
    }

    /// Run the session to a terminal state
    pub async fn run(&mut self, goal: &Goal) -> Result<SessionReport> {
        let mut history = ConversationHistory::new();
        history.push(self.initial_content(goal)?);

        let mut state = TurnState::new(self.max_turns);
        log::info!(
            "Starting session with {} (max {} turns)",
            self.model.name(),
            state.max_turns
        );

        while state.should_continue() {
            let turn = state.begin_turn();
            println!("\n----- TURN {}/{} -----", turn, state.max_turns);

            let response = self.model.generate(history.contents()).await?;
            let content = response.content;
            self.show_model_turn(&content);

            let requests: Vec<ActionRequest> = content
                .function_calls()
                .map(ActionRequest::from_call)
                .collect();
            let final_text = content.visible_text();
            history.push(content);

            if requests.is_empty() {
                println!("\n✅ Done: {}", final_text);
                state.finish(SessionOutcome::Done { text: final_text });
                break;
            }

            println!("▶ Executing {} action(s)…", requests.len());
            let execution = {
                let mut gate = SafetyGate::new(&mut *self.confirmer);
                self.executor
                    .execute_turn(&mut *self.page, &requests, &mut gate)
            };
            state.actions_executed += execution
                .outcomes
                .iter()
                .filter(|o| o.error.as_deref() != Some(USER_DENIED))
                .count();

            let observation = Observation::capture(&mut *self.page, execution.outcomes)?;
            log::info!("Turn {} ended on {}", turn, observation.url);
            history.push(observation.into_content());

            if execution.denied {
                state.finish(SessionOutcome::StoppedDenied);
            }
        }

        let turns = state.turn;
        let actions_executed = state.actions_executed;
        let outcome = state.into_outcome();
        if outcome == SessionOutcome::StoppedBudget {
            println!("\n⏹ Reached step limit. Stopping.");
        }

        Ok(SessionReport {
            outcome,
            turns,
            actions_executed,
            history,
        })
    }

    /// Goal text plus a screenshot of the starting page
    fn initial_content(&mut self, goal: &Goal) -> Result<Content> {
        if let Some(ref url) = self.start_url {
            log::info!("Opening start page {}", url);
            self.page.goto(url)?;
        }
        let screenshot = self.page.screenshot_png()?;
        Ok(Content::user(vec![
            Part::text(goal.as_str()),
            Part::png(&screenshot),
        ]))
    }

    fn show_model_turn(&self, content: &Content) {
        for thought in content.thoughts() {
            println!("💭 {}", thought.trim());
        }
        if content.has_function_calls() {
            let text = content.visible_text();
            if !text.is_empty() {
                println!("{}", text);
            }
        }
    }
}
