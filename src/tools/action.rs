//! The action vocabulary
//!
//! Function calls from the model are parsed into a closed [`Action`] enum as
//! soon as the response arrives. A call whose arguments do not fit its action
//! keeps the parse error, which the executor then reports as that action's
//! outcome.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::core::ActionError;
use crate::llm::FunctionCall;

/// Argument key that carries the model's safety review
pub const SAFETY_DECISION_KEY: &str = "safety_decision";

/// Default wheel delta for `scroll_at`
pub const DEFAULT_SCROLL_MAGNITUDE: i64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for ScrollDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown scroll direction '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for ScrollDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Accepts integral numbers and floors fractional ones
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() => Ok(f.floor() as i64),
        _ => Err(de::Error::custom(format!("expected a coordinate, got {}", value))),
    }
}

fn default_true() -> bool {
    true
}

fn default_magnitude() -> i64 {
    DEFAULT_SCROLL_MAGNITUDE
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NavigateArgs {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointArgs {
    #[serde(deserialize_with = "coordinate")]
    pub x: i64,
    #[serde(deserialize_with = "coordinate")]
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeTextArgs {
    #[serde(deserialize_with = "coordinate")]
    pub x: i64,
    #[serde(deserialize_with = "coordinate")]
    pub y: i64,
    pub text: String,
    #[serde(default = "default_true")]
    pub clear_before_typing: bool,
    #[serde(default = "default_true")]
    pub press_enter: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyCombinationArgs {
    pub keys: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScrollDocumentArgs {
    pub direction: ScrollDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScrollAtArgs {
    #[serde(deserialize_with = "coordinate")]
    pub x: i64,
    #[serde(deserialize_with = "coordinate")]
    pub y: i64,
    pub direction: ScrollDirection,
    #[serde(default = "default_magnitude", deserialize_with = "coordinate")]
    pub magnitude: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DragAndDropArgs {
    #[serde(deserialize_with = "coordinate")]
    pub x: i64,
    #[serde(deserialize_with = "coordinate")]
    pub y: i64,
    #[serde(deserialize_with = "coordinate")]
    pub destination_x: i64,
    #[serde(deserialize_with = "coordinate")]
    pub destination_y: i64,
}

/// Every action the executor knows, with its typed arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenWebBrowser,
    Wait5Seconds,
    GoBack,
    GoForward,
    Search,
    Navigate(NavigateArgs),
    ClickAt(PointArgs),
    HoverAt(PointArgs),
    TypeTextAt(TypeTextArgs),
    KeyCombination(KeyCombinationArgs),
    ScrollDocument(ScrollDocumentArgs),
    ScrollAt(ScrollAtArgs),
    DragAndDrop(DragAndDropArgs),
    /// A name outside the vocabulary; executed as a no-op with a warning
    Unimplemented(String),
}

fn typed<T: DeserializeOwned>(name: &str, args: &Map<String, Value>) -> Result<T, ActionError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| ActionError::invalid(name, e.to_string()))
}

impl Action {
    /// Parse a named action and its argument bag
    pub fn parse(name: &str, args: &Map<String, Value>) -> Result<Self, ActionError> {
        let action = match name {
            "open_web_browser" => Self::OpenWebBrowser,
            "wait_5_seconds" => Self::Wait5Seconds,
            "go_back" => Self::GoBack,
            "go_forward" => Self::GoForward,
            "search" => Self::Search,
            "navigate" => Self::Navigate(typed(name, args)?),
            "click_at" => Self::ClickAt(typed(name, args)?),
            "hover_at" => Self::HoverAt(typed(name, args)?),
            "type_text_at" => Self::TypeTextAt(typed(name, args)?),
            "key_combination" => Self::KeyCombination(typed(name, args)?),
            "scroll_document" => Self::ScrollDocument(typed(name, args)?),
            "scroll_at" => Self::ScrollAt(typed(name, args)?),
            "drag_and_drop" => Self::DragAndDrop(typed(name, args)?),
            other => Self::Unimplemented(other.to_string()),
        };
        Ok(action)
    }
}

/// The model's request for operator confirmation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SafetyDecision {
    pub explanation: String,
    pub decision: Option<String>,
}

impl SafetyDecision {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                explanation: map
                    .get("explanation")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                decision: map
                    .get("decision")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            Value::String(s) => Self {
                explanation: s.clone(),
                decision: None,
            },
            other => Self {
                explanation: other.to_string(),
                decision: None,
            },
        }
    }
}

/// One action requested by the model, ready for the gate and the executor
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub name: String,
    pub call_id: Option<String>,
    pub args: Map<String, Value>,
    pub action: Result<Action, ActionError>,
    pub safety_decision: Option<SafetyDecision>,
}

impl ActionRequest {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        let name = name.into();
        let mut action_args = args.clone();
        let safety_decision = action_args
            .remove(SAFETY_DECISION_KEY)
            .map(|v| SafetyDecision::from_value(&v));
        let action = Action::parse(&name, &action_args);

        Self {
            name,
            call_id: None,
            args,
            action,
            safety_decision,
        }
    }

    pub fn from_call(call: &FunctionCall) -> Self {
        let mut request = Self::new(call.name.clone(), call.args.clone());
        request.call_id = call.id.clone();
        request
    }

    pub fn requires_confirmation(&self) -> bool {
        self.safety_decision.is_some()
    }
}

impl fmt::Display for ActionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, Value::Object(self.args.clone()))
    }
}
