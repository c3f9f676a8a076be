//! Browser automation integration tests
//!
//! Drives a real headless Chrome through the executor. Requires Chrome, so
//! every test is ignored by default: `cargo test -- --ignored`

mod common;

use std::fs;

use browser_pilot::core::{file_url, Config};
use browser_pilot::tools::{ActionRequest, BrowserPage, ChromeSession, SafetyGate};
use common::{fast_executor, ScriptedConfirmer};
use serde_json::{json, Value};

const FORM_PAGE: &str = r#"<!doctype html>
<html><body style="margin:0">
<form method="get">
  <input name="q" style="position:absolute;left:0;top:0;width:100vw;height:100vh">
</form>
</body></html>"#;

fn request(name: &str, args: Value) -> ActionRequest {
    ActionRequest::new(name, args.as_object().cloned().unwrap_or_default())
}

fn launch() -> Option<ChromeSession> {
    let mut config = Config::default();
    config.browser.headless = true;
    match ChromeSession::launch(&config) {
        Ok(session) => Some(session),
        Err(e) => {
            eprintln!("Skipping test: {}", e);
            None
        }
    }
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_type_and_submit_form() {
    let page_path = std::env::temp_dir().join("browser-pilot-form.html");
    fs::write(&page_path, FORM_PAGE).unwrap();
    let Some(mut session) = launch() else { return };

    session.goto(&file_url(&page_path).unwrap()).unwrap();

    let mut confirmer = ScriptedConfirmer::new(&[]);
    let mut gate = SafetyGate::new(&mut confirmer);
    let requests = vec![request(
        "type_text_at",
        json!({"x": 500, "y": 500, "text": "hello"}),
    )];
    let turn = fast_executor().execute_turn(&mut session, &requests, &mut gate);

    assert!(turn.outcomes[0].error.is_none(), "{:?}", turn.outcomes[0]);
    // Enter submits the form back to the same file with the query attached
    std::thread::sleep(std::time::Duration::from_millis(500));
    assert!(session.url().unwrap().contains("q=hello"));

    session.close().unwrap();
    fs::remove_file(&page_path).ok();
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_navigate_and_go_back() {
    let Some(mut session) = launch() else { return };
    let mut confirmer = ScriptedConfirmer::new(&[]);
    let mut gate = SafetyGate::new(&mut confirmer);

    let requests = vec![
        request("navigate", json!({"url": "data:text/html,<p>one</p>"})),
        request("navigate", json!({"url": "data:text/html,<p>two</p>"})),
        request("go_back", json!({})),
    ];
    let turn = fast_executor().execute_turn(&mut session, &requests, &mut gate);

    assert_eq!(turn.outcomes.len(), 3);
    assert!(turn.outcomes.iter().all(|o| o.error.is_none()));
    std::thread::sleep(std::time::Duration::from_millis(500));
    assert!(session.url().unwrap().contains("one"));

    session.close().unwrap();
}
