//! Action executor
//!
//! Runs parsed actions against the page one at a time, in the order the model
//! proposed them. Each action gets exactly one attempt and exactly one
//! outcome; failures are recorded on the outcome and the turn carries on.

use serde_json::{Map, Value};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::{ActionError, Config, PixelPoint};
use crate::tools::action::{
    Action, ActionRequest, DragAndDropArgs, ScrollAtArgs, ScrollDirection, TypeTextArgs,
};
use crate::tools::browser::BrowserPage;
use crate::tools::coords::CoordinateMapper;
use crate::tools::keys::KeyChord;
use crate::tools::safety::{GateDecision, SafetyGate};

pub const USER_DENIED: &str = "user_denied";
pub const UNIMPLEMENTED_ACTION: &str = "unimplemented_action";

/// Intermediate pointer positions between drag source and destination
const DRAG_STEPS: i64 = 10;

/// Horizontal offset for left/right `scroll_document`
const HORIZONTAL_SCROLL_PX: i64 = 400;

const READY_STATE_POLL: Duration = Duration::from_millis(50);

/// Result of one requested action, as reported to the model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionOutcome {
    pub name: String,
    pub call_id: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub safety_acknowledgement: Option<bool>,
}

impl ActionOutcome {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn for_request(request: &ActionRequest) -> Self {
        Self {
            call_id: request.call_id.clone(),
            ..Self::new(request.name.clone())
        }
    }

    pub fn denied(request: &ActionRequest) -> Self {
        Self {
            error: Some(USER_DENIED.to_string()),
            ..Self::for_request(request)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// `{url, ...outcome fields}` for the function response
    pub fn response_fields(&self, url: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("url".to_string(), Value::String(url.to_string()));
        if let Some(ref error) = self.error {
            fields.insert("error".to_string(), Value::String(error.clone()));
        }
        if let Some(ref warning) = self.warning {
            fields.insert("warning".to_string(), Value::String(warning.clone()));
        }
        if let Some(ack) = self.safety_acknowledgement {
            fields.insert("safety_acknowledgement".to_string(), Value::Bool(ack));
        }
        fields
    }
}

/// Outcomes of one turn's batch
#[derive(Debug, Clone, Default)]
pub struct TurnExecution {
    /// One per executed or denied request, in request order
    pub outcomes: Vec<ActionOutcome>,
    /// The operator refused a flagged action; the session must stop
    pub denied: bool,
}

/// Timings and fixed targets the executor needs
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    /// Destination of the `search` action
    pub search_url: String,
    /// Length of `wait_5_seconds`
    pub wait_duration: Duration,
    /// Upper bound on the post-action load wait
    pub load_timeout: Duration,
    /// Fixed delay after the load wait
    pub settle_delay: Duration,
}

impl ExecutorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            search_url: config.browser.search_url.clone(),
            wait_duration: Duration::from_secs(5),
            load_timeout: config.load_timeout(),
            settle_delay: config.settle_delay(),
        }
    }

    /// No waiting at all; for scripted pages
    pub fn immediate(search_url: impl Into<String>) -> Self {
        Self {
            search_url: search_url.into(),
            wait_duration: Duration::ZERO,
            load_timeout: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }
}

pub struct ActionExecutor {
    mapper: CoordinateMapper,
    settings: ExecutorSettings,
}

impl ActionExecutor {
    pub fn new(mapper: CoordinateMapper, settings: ExecutorSettings) -> Self {
        Self { mapper, settings }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CoordinateMapper::new(config.viewport()),
            ExecutorSettings::from_config(config),
        )
    }

    /// Run a turn's requests in order, stopping at the first denial
    pub fn execute_turn(
        &self,
        page: &mut dyn BrowserPage,
        requests: &[ActionRequest],
        gate: &mut SafetyGate<'_>,
    ) -> TurnExecution {
        let mut turn = TurnExecution {
            outcomes: Vec::with_capacity(requests.len()),
            denied: false,
        };

        for request in requests {
            let acknowledged = match gate.review(request) {
                GateDecision::NotRequired => false,
                GateDecision::Acknowledged => true,
                GateDecision::Denied => {
                    println!("⛔ User denied. Stopping.");
                    turn.outcomes.push(ActionOutcome::denied(request));
                    turn.denied = true;
                    let skipped = requests.len() - turn.outcomes.len();
                    if skipped > 0 {
                        log::info!("Skipping {} remaining action(s) after denial", skipped);
                    }
                    break;
                }
            };

            let mut outcome = self.execute(page, request);
            if acknowledged {
                outcome.safety_acknowledgement = Some(true);
            }
            turn.outcomes.push(outcome);
        }

        turn
    }

    /// Run one request that has already passed the safety gate
    pub fn execute(&self, page: &mut dyn BrowserPage, request: &ActionRequest) -> ActionOutcome {
        println!("→ {}", request);
        let mut outcome = ActionOutcome::for_request(request);

        let result = match request.action {
            Ok(ref action) => self.perform(page, action),
            Err(ref e) => Err(e.clone()),
        };

        match result {
            Ok(Some(warning)) => outcome.warning = Some(warning.to_string()),
            Ok(None) => {}
            Err(e) => {
                println!("❌ Error in {}: {}", request.name, e);
                outcome.error = Some(e.to_string());
            }
        }

        self.settle(page);
        outcome
    }

    /// Perform the browser side of an action. `Ok(Some(_))` carries a warning.
    fn perform(
        &self,
        page: &mut dyn BrowserPage,
        action: &Action,
    ) -> Result<Option<&'static str>, ActionError> {
        match action {
            // The session is already open
            Action::OpenWebBrowser => {}
            Action::Wait5Seconds => thread::sleep(self.settings.wait_duration),
            Action::GoBack => page.go_back()?,
            Action::GoForward => page.go_forward()?,
            Action::Search => page.goto(&self.settings.search_url)?,
            Action::Navigate(args) => page.goto(&args.url)?,
            Action::ClickAt(args) => page.mouse_click(self.point("click_at", args.x, args.y)?)?,
            Action::HoverAt(args) => page.mouse_move(self.point("hover_at", args.x, args.y)?)?,
            Action::TypeTextAt(args) => self.type_text_at(page, args)?,
            Action::KeyCombination(args) => {
                let chord: KeyChord = args.keys.parse()?;
                page.press_keys(&chord)?;
            }
            Action::ScrollDocument(args) => scroll_document(page, args.direction)?,
            Action::ScrollAt(args) => self.scroll_at(page, args)?,
            Action::DragAndDrop(args) => self.drag_and_drop(page, args)?,
            Action::Unimplemented(name) => {
                println!("⚠ Not implemented: {}", name);
                return Ok(Some(UNIMPLEMENTED_ACTION));
            }
        }
        Ok(None)
    }

    /// Map a grid point, refusing pixels that cannot be represented
    fn point(&self, action: &str, x: i64, y: i64) -> Result<PixelPoint, ActionError> {
        self.mapper.map(x, y).ok_or_else(|| {
            ActionError::invalid(action, format!("coordinate ({}, {}) is out of range", x, y))
        })
    }

    fn type_text_at(&self, page: &mut dyn BrowserPage, args: &TypeTextArgs) -> Result<(), ActionError> {
        page.mouse_click(self.point("type_text_at", args.x, args.y)?)?;
        if args.clear_before_typing {
            page.press_keys(&KeyChord::select_all())?;
            page.press_keys(&KeyChord::single("Backspace"))?;
        }
        page.type_text(&args.text)?;
        if args.press_enter {
            page.press_keys(&KeyChord::single("Enter"))?;
        }
        Ok(())
    }

    fn scroll_at(&self, page: &mut dyn BrowserPage, args: &ScrollAtArgs) -> Result<(), ActionError> {
        if args.magnitude < 0 {
            return Err(ActionError::invalid(
                "scroll_at",
                format!("magnitude must not be negative, got {}", args.magnitude),
            ));
        }
        let at = self.point("scroll_at", args.x, args.y)?;
        page.mouse_move(at)?;
        // Non-negative, so negation cannot overflow
        let (dx, dy) = match args.direction {
            ScrollDirection::Down => (0, args.magnitude),
            ScrollDirection::Up => (0, -args.magnitude),
            ScrollDirection::Right => (args.magnitude, 0),
            ScrollDirection::Left => (-args.magnitude, 0),
        };
        page.mouse_wheel(at, dx, dy)?;
        Ok(())
    }

    fn drag_and_drop(&self, page: &mut dyn BrowserPage, args: &DragAndDropArgs) -> Result<(), ActionError> {
        let source = self.point("drag_and_drop", args.x, args.y)?;
        let destination = self.point("drag_and_drop", args.destination_x, args.destination_y)?;
        let path = interpolate(source, destination, DRAG_STEPS);

        page.mouse_move(source)?;
        page.mouse_down(source)?;
        for point in path {
            page.mouse_move(point)?;
        }
        page.mouse_up(destination)?;
        Ok(())
    }

    /// Wait for the page to finish loading, then give dynamic UI a moment.
    /// Never fails: a slow or broken page is the model's problem next turn.
    fn settle(&self, page: &mut dyn BrowserPage) {
        let deadline = Instant::now() + self.settings.load_timeout;
        loop {
            match page.ready_state() {
                Ok(state) if state == "complete" => break,
                Ok(_) => {}
                Err(e) => {
                    log::debug!("Load state probe failed: {}", e);
                    break;
                }
            }
            let now = Instant::now();
            if now >= deadline {
                log::debug!("Page did not finish loading within {:?}", self.settings.load_timeout);
                break;
            }
            thread::sleep(READY_STATE_POLL.min(deadline - now));
        }

        thread::sleep(self.settings.settle_delay);
    }
}

fn scroll_document(page: &mut dyn BrowserPage, direction: ScrollDirection) -> Result<(), ActionError> {
    match direction {
        ScrollDirection::Down => page.press_keys(&KeyChord::single("PageDown"))?,
        ScrollDirection::Up => page.press_keys(&KeyChord::single("PageUp"))?,
        ScrollDirection::Left => {
            page.evaluate(&format!("window.scrollBy(-{}, 0)", HORIZONTAL_SCROLL_PX))?
        }
        ScrollDirection::Right => {
            page.evaluate(&format!("window.scrollBy({}, 0)", HORIZONTAL_SCROLL_PX))?
        }
    }
    Ok(())
}

/// `steps` evenly spaced points after `from`, the last one exactly `to`
fn interpolate(from: PixelPoint, to: PixelPoint, steps: i64) -> Vec<PixelPoint> {
    (1..=steps)
        .map(|i| PixelPoint::new(lerp(from.x, to.x, i, steps), lerp(from.y, to.y, i, steps)))
        .collect()
}

/// Step `i` of `steps` from `a` to `b`. Computed in i128; the result lies
/// between `a` and `b`, so it always fits back into an `i64`.
fn lerp(a: i64, b: i64, i: i64, steps: i64) -> i64 {
    let (a, b) = (i128::from(a), i128::from(b));
    let value = a + (b - a) * i128::from(i) / i128::from(steps);
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
