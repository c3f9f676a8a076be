//! Fakes shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use browser_pilot::core::{PageError, PixelPoint, Result, Viewport};
use browser_pilot::llm::{ComputerUseModel, Content, FunctionCall, ModelTurn, Part};
use browser_pilot::tools::{
    ActionExecutor, BrowserPage, Confirmer, CoordinateMapper, ExecutorSettings, KeyChord,
    PageResult, SafetyDecision,
};

pub const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
pub const SEARCH_URL: &str = "https://www.google.com";

/// Browser operations as the page saw them
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Goto(String),
    GoBack,
    GoForward,
    Click(PixelPoint),
    Move(PixelPoint),
    Down(PixelPoint),
    Up(PixelPoint),
    Wheel(PixelPoint, i64, i64),
    Keys(KeyChord),
    Type(String),
    Eval(String),
    Close,
}

impl Op {
    fn kind(&self) -> &'static str {
        match self {
            Op::Goto(_) => "goto",
            Op::GoBack => "go_back",
            Op::GoForward => "go_forward",
            Op::Click(_) => "click",
            Op::Move(_) => "move",
            Op::Down(_) => "down",
            Op::Up(_) => "up",
            Op::Wheel(..) => "wheel",
            Op::Keys(_) => "keys",
            Op::Type(_) => "type",
            Op::Eval(_) => "eval",
            Op::Close => "close",
        }
    }
}

/// A page that records every operation and can be told to fail some of them
pub struct RecordingPage {
    pub ops: Vec<Op>,
    pub current_url: String,
    pub screenshots: usize,
    pub closed: bool,
    /// Number of `document.readyState` probes
    pub ready_probes: usize,
    failing: Vec<&'static str>,
    ready_states: VecDeque<&'static str>,
    idle_state: &'static str,
}

impl RecordingPage {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            current_url: "about:blank".to_string(),
            screenshots: 0,
            closed: false,
            ready_probes: 0,
            failing: Vec::new(),
            ready_states: VecDeque::new(),
            idle_state: "complete",
        }
    }

    /// Ready states to report, in order, before settling on `"complete"`
    pub fn with_ready_states(mut self, states: &[&'static str]) -> Self {
        self.ready_states = states.iter().copied().collect();
        self
    }

    /// A page that never finishes loading
    pub fn stuck_loading(mut self) -> Self {
        self.idle_state = "loading";
        self
    }

    /// Make every operation of this kind fail, e.g. `"click"`.
    /// `"ready_state"` makes the load-state probe fail.
    pub fn failing(mut self, kind: &'static str) -> Self {
        self.failing.push(kind);
        self
    }

    fn record(&mut self, op: Op) -> PageResult<()> {
        let kind = op.kind();
        self.ops.push(op);
        if self.failing.contains(&kind) {
            return Err(PageError::new(format!("{} failed", kind)));
        }
        Ok(())
    }
}

impl BrowserPage for RecordingPage {
    fn goto(&mut self, url: &str) -> PageResult<()> {
        self.record(Op::Goto(url.to_string()))?;
        self.current_url = url.to_string();
        Ok(())
    }

    fn go_back(&mut self) -> PageResult<()> {
        self.record(Op::GoBack)
    }

    fn go_forward(&mut self) -> PageResult<()> {
        self.record(Op::GoForward)
    }

    fn mouse_click(&mut self, at: PixelPoint) -> PageResult<()> {
        self.record(Op::Click(at))
    }

    fn mouse_move(&mut self, to: PixelPoint) -> PageResult<()> {
        self.record(Op::Move(to))
    }

    fn mouse_down(&mut self, at: PixelPoint) -> PageResult<()> {
        self.record(Op::Down(at))
    }

    fn mouse_up(&mut self, at: PixelPoint) -> PageResult<()> {
        self.record(Op::Up(at))
    }

    fn mouse_wheel(&mut self, at: PixelPoint, delta_x: i64, delta_y: i64) -> PageResult<()> {
        self.record(Op::Wheel(at, delta_x, delta_y))
    }

    fn press_keys(&mut self, chord: &KeyChord) -> PageResult<()> {
        self.record(Op::Keys(chord.clone()))
    }

    fn type_text(&mut self, text: &str) -> PageResult<()> {
        self.record(Op::Type(text.to_string()))
    }

    fn evaluate(&mut self, script: &str) -> PageResult<()> {
        self.record(Op::Eval(script.to_string()))
    }

    fn ready_state(&mut self) -> PageResult<String> {
        self.ready_probes += 1;
        if self.failing.contains(&"ready_state") {
            return Err(PageError::new("ready_state failed"));
        }
        Ok(self
            .ready_states
            .pop_front()
            .unwrap_or(self.idle_state)
            .to_string())
    }

    fn screenshot_png(&mut self) -> PageResult<Vec<u8>> {
        self.screenshots += 1;
        Ok(FAKE_PNG.to_vec())
    }

    fn url(&mut self) -> PageResult<String> {
        Ok(self.current_url.clone())
    }

    fn close(&mut self) -> PageResult<()> {
        self.closed = true;
        self.record(Op::Close)
    }
}

/// A model that replays canned turns and remembers how much history it saw
pub struct ScriptedModel {
    turns: Mutex<VecDeque<Content>>,
    pub seen_history: Mutex<Vec<usize>>,
}

impl ScriptedModel {
    pub fn new(turns: Vec<Content>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            seen_history: Mutex::new(Vec::new()),
        }
    }

    /// A model that asks for the same action forever
    pub fn repeating(call: Part, times: usize) -> Self {
        Self::new((0..times).map(|_| Content::model(vec![call.clone()])).collect())
    }

    pub fn calls(&self) -> usize {
        self.seen_history.lock().unwrap().len()
    }
}

#[async_trait]
impl ComputerUseModel for ScriptedModel {
    async fn generate(&self, history: &[Content]) -> Result<ModelTurn> {
        self.seen_history.lock().unwrap().push(history.len());
        let content = self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Content::model(vec![Part::text("out of script")]));
        Ok(ModelTurn::new(content))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Answers confirmation prompts from a queue; denies once the queue is empty
pub struct ScriptedConfirmer {
    answers: VecDeque<bool>,
    pub asked: Vec<SafetyDecision>,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, decision: &SafetyDecision) -> bool {
        self.asked.push(decision.clone());
        self.answers.pop_front().unwrap_or(false)
    }
}

/// A model function call part
pub fn call(name: &str, args: Value) -> Part {
    Part::function_call(FunctionCall {
        id: None,
        name: name.to_string(),
        args: args.as_object().cloned().unwrap_or_default(),
    })
}

/// Executor for a 1440x900 viewport with no waiting
pub fn fast_executor() -> ActionExecutor {
    ActionExecutor::new(
        CoordinateMapper::new(Viewport::new(1440, 900)),
        ExecutorSettings::immediate(SEARCH_URL),
    )
}

/// Executor that waits up to `load_timeout` for the page to load
pub fn loading_executor(load_timeout: Duration) -> ActionExecutor {
    ActionExecutor::new(
        CoordinateMapper::new(Viewport::new(1440, 900)),
        ExecutorSettings {
            load_timeout,
            ..ExecutorSettings::immediate(SEARCH_URL)
        },
    )
}
