//! Turn loop integration tests
//!
//! Runs the orchestrator end to end with a scripted model, a recording page
//! and a scripted confirmer.

mod common;

use browser_pilot::agent::{SessionOutcome, TurnOrchestrator};
use browser_pilot::core::{Config, Goal};
use browser_pilot::llm::{Content, FunctionResponse, Part};
use browser_pilot::tools::executor::USER_DENIED;
use common::{call, fast_executor, Op, RecordingPage, ScriptedConfirmer, ScriptedModel, FAKE_PNG};
use serde_json::json;

fn goal(text: &str) -> Goal {
    Goal::from_words([text]).unwrap()
}

fn responses(content: &Content) -> Vec<&FunctionResponse> {
    content
        .parts
        .iter()
        .filter_map(|p| p.function_response.as_ref())
        .collect()
}

#[tokio::test]
async fn test_navigate_then_done() {
    let model = ScriptedModel::new(vec![
        Content::model(vec![call("navigate", json!({"url": "https://example.com"}))]),
        Content::model(vec![Part::text("Example Domain is open.")]),
    ]);
    let mut page = RecordingPage::new();
    let mut confirmer = ScriptedConfirmer::new(&[]);
    let config = Config::default();

    let report = TurnOrchestrator::new(&model, &mut page, &mut confirmer, &config)
        .with_executor(fast_executor())
        .with_start_url(None)
        .run(&goal("open example.com"))
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        SessionOutcome::Done {
            text: "Example Domain is open.".to_string()
        }
    );
    assert_eq!(report.turns, 2);
    assert_eq!(report.actions_executed, 1);

    // goal, model, observation, model
    let history = report.history.contents();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].parts[0].text.as_deref(), Some("open example.com"));
    assert!(history[0].parts[1].inline_data.is_some());

    let observed = responses(&history[2]);
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].name, "navigate");
    assert_eq!(observed[0].response["url"], "https://example.com");
    assert_eq!(observed[0].parts[0].inline_data.decode().unwrap(), FAKE_PNG);

    assert_eq!(*model.seen_history.lock().unwrap(), vec![1, 3]);
    assert_eq!(page.screenshots, 2);
}

#[tokio::test]
async fn test_budget_exhaustion_stops_the_loop() {
    let model = ScriptedModel::repeating(call("hover_at", json!({"x": 10, "y": 10})), 10);
    let mut page = RecordingPage::new();
    let mut confirmer = ScriptedConfirmer::new(&[]);
    let config = Config::default();

    let report = TurnOrchestrator::new(&model, &mut page, &mut confirmer, &config)
        .with_executor(fast_executor())
        .with_start_url(None)
        .with_max_turns(3)
        .run(&goal("never finishes"))
        .await
        .unwrap();

    assert_eq!(report.outcome, SessionOutcome::StoppedBudget);
    assert_eq!(report.turns, 3);
    assert_eq!(model.calls(), 3);
    assert_eq!(report.history.len(), 7);
    assert_eq!(report.history.model_turns(), 3);
}

#[tokio::test]
async fn test_denial_stops_the_session() {
    let model = ScriptedModel::new(vec![
        Content::model(vec![
            Part::text("I will place the order."),
            call(
                "click_at",
                json!({"x": 900, "y": 900, "safety_decision": {"explanation": "Places an order"}}),
            ),
            call("wait_5_seconds", json!({})),
        ]),
        Content::model(vec![Part::text("should never be asked")]),
    ]);
    let mut page = RecordingPage::new();
    let mut confirmer = ScriptedConfirmer::new(&[false]);
    let config = Config::default();

    let report = TurnOrchestrator::new(&model, &mut page, &mut confirmer, &config)
        .with_executor(fast_executor())
        .with_start_url(None)
        .run(&goal("buy the thing"))
        .await
        .unwrap();

    assert_eq!(report.outcome, SessionOutcome::StoppedDenied);
    assert_eq!(model.calls(), 1);
    assert_eq!(report.actions_executed, 0);
    assert!(page.ops.is_empty());

    let last = report.history.last().unwrap();
    let observed = responses(last);
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].response["error"], USER_DENIED);
    assert_eq!(confirmer.asked.len(), 1);
}

#[tokio::test]
async fn test_acknowledged_action_continues() {
    let model = ScriptedModel::new(vec![
        Content::model(vec![call(
            "click_at",
            json!({"x": 500, "y": 500, "safety_decision": {"explanation": "Accept cookies"}}),
        )]),
        Content::model(vec![Part::text("Cookies accepted.")]),
    ]);
    let mut page = RecordingPage::new();
    let mut confirmer = ScriptedConfirmer::new(&[true]);
    let config = Config::default();

    let report = TurnOrchestrator::new(&model, &mut page, &mut confirmer, &config)
        .with_executor(fast_executor())
        .with_start_url(None)
        .run(&goal("accept cookies"))
        .await
        .unwrap();

    assert!(matches!(report.outcome, SessionOutcome::Done { .. }));
    let observed = responses(&report.history.contents()[2]);
    assert_eq!(observed[0].response["safety_acknowledgement"], true);
}

#[tokio::test]
async fn test_one_response_per_action_in_order() {
    let model = ScriptedModel::new(vec![
        Content::model(vec![
            call("click_at", json!({"x": 100, "y": 100})),
            call("type_text_at", json!({"x": 100, "y": 100, "text": "rust"})),
            call("take_screenshot", json!({})),
        ]),
        Content::model(vec![Part::text("done")]),
    ]);
    let mut page = RecordingPage::new().failing("type");
    let mut confirmer = ScriptedConfirmer::new(&[]);
    let config = Config::default();

    let report = TurnOrchestrator::new(&model, &mut page, &mut confirmer, &config)
        .with_executor(fast_executor())
        .with_start_url(None)
        .run(&goal("search for rust"))
        .await
        .unwrap();

    let observed = responses(&report.history.contents()[2]);
    let names: Vec<&str> = observed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["click_at", "type_text_at", "take_screenshot"]);
    assert!(!observed[0].response.contains_key("error"));
    assert_eq!(observed[1].response["error"], "type failed");
    assert!(observed[2].response.contains_key("warning"));
}

#[test]
fn test_start_url_is_loaded_first() {
    let model = ScriptedModel::new(vec![Content::model(vec![Part::text("nothing to do")])]);
    let mut page = RecordingPage::new();
    let mut confirmer = ScriptedConfirmer::new(&[]);
    let config = Config::default();

    let report = tokio_test::block_on(
        TurnOrchestrator::new(&model, &mut page, &mut confirmer, &config)
            .with_executor(fast_executor())
            .with_start_url(Some("file:///tmp/form.html".to_string()))
            .run(&goal("look around")),
    )
    .unwrap();

    assert_eq!(report.turns, 1);
    assert_eq!(page.ops, vec![Op::Goto("file:///tmp/form.html".to_string())]);
    assert_eq!(page.screenshots, 1);
}
