//! Chrome session over the DevTools protocol
//!
//! One browser process with one tab, sized to the session viewport. The
//! process is terminated when the session is closed or dropped.

use headless_chrome::browser::tab::point::Point;
use headless_chrome::browser::tab::ModifierKey;
use headless_chrome::protocol::cdp::{Input, Page};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Config, PageError, PilotError, PixelPoint, Result};
use crate::tools::browser::page::{BrowserPage, PageResult};
use crate::tools::keys::{KeyChord, Modifier};

/// Browser session that owns a Chrome/Chromium instance
pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

fn page_err(context: &str, e: impl std::fmt::Display) -> PageError {
    PageError::new(format!("{}: {}", context, e))
}

fn to_point(p: PixelPoint) -> Point {
    Point {
        x: p.x as f64,
        y: p.y as f64,
    }
}

impl ChromeSession {
    /// Launch a new browser sized to the configured viewport
    pub fn launch(config: &Config) -> Result<Self> {
        let viewport = config.viewport();
        let mut launch_opts = LaunchOptions::default();

        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts
            .args
            .push(OsStr::new("--disable-blink-features=AutomationControlled"));
        launch_opts.args.push(OsStr::new("--no-first-run"));
        launch_opts.args.push(OsStr::new("--no-default-browser-check"));

        // The session may sit on an operator prompt for a long time
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = config.browser.headless;
        launch_opts.window_size = Some((viewport.width, viewport.height));

        if let Some(ref path) = config.browser.chrome_path {
            launch_opts.path = Some(path.clone());
        }

        log::info!(
            "Launching Chrome ({}x{}, headless={})",
            viewport.width,
            viewport.height,
            config.browser.headless
        );

        let browser = Browser::new(launch_opts)
            .map_err(|e| PilotError::browser(format!("Browser launch failed: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| PilotError::browser(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser: Some(browser),
            tab,
        })
    }

    fn dispatch_mouse(
        &self,
        kind: Input::DispatchMouseEventTypeOption,
        at: PixelPoint,
        button: Option<Input::MouseButton>,
        delta: Option<(i64, i64)>,
    ) -> PageResult<()> {
        let point = to_point(at);
        let click_count = button.as_ref().map(|_| 1);
        self.tab
            .call_method(Input::DispatchMouseEvent {
                Type: kind,
                x: point.x,
                y: point.y,
                modifiers: None,
                timestamp: None,
                button,
                buttons: None,
                click_count,
                force: None,
                tangential_pressure: None,
                tilt_x: None,
                tilt_y: None,
                twist: None,
                delta_x: delta.map(|d| d.0 as f64),
                delta_y: delta.map(|d| d.1 as f64),
                pointer_Type: None,
            })
            .map_err(|e| page_err("mouse event failed", e))?;
        Ok(())
    }

    fn history_step(&self, script: &str, what: &str) -> PageResult<()> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| page_err(what, e))?;
        Ok(())
    }
}

impl BrowserPage for ChromeSession {
    fn goto(&mut self, url: &str) -> PageResult<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| page_err(&format!("Failed to navigate to {}", url), e))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| page_err("Navigation timeout", e))?;
        Ok(())
    }

    fn go_back(&mut self) -> PageResult<()> {
        self.history_step("window.history.back()", "Failed to go back")
    }

    fn go_forward(&mut self) -> PageResult<()> {
        self.history_step("window.history.forward()", "Failed to go forward")
    }

    fn mouse_click(&mut self, at: PixelPoint) -> PageResult<()> {
        self.tab
            .click_point(to_point(at))
            .map_err(|e| page_err(&format!("click at {} failed", at), e))?;
        Ok(())
    }

    fn mouse_move(&mut self, to: PixelPoint) -> PageResult<()> {
        self.tab
            .move_mouse_to_point(to_point(to))
            .map_err(|e| page_err(&format!("mouse move to {} failed", to), e))?;
        Ok(())
    }

    fn mouse_down(&mut self, at: PixelPoint) -> PageResult<()> {
        self.dispatch_mouse(
            Input::DispatchMouseEventTypeOption::MousePressed,
            at,
            Some(Input::MouseButton::Left),
            None,
        )
    }

    fn mouse_up(&mut self, at: PixelPoint) -> PageResult<()> {
        self.dispatch_mouse(
            Input::DispatchMouseEventTypeOption::MouseReleased,
            at,
            Some(Input::MouseButton::Left),
            None,
        )
    }

    fn mouse_wheel(&mut self, at: PixelPoint, delta_x: i64, delta_y: i64) -> PageResult<()> {
        self.dispatch_mouse(
            Input::DispatchMouseEventTypeOption::MouseWheel,
            at,
            None,
            Some((delta_x, delta_y)),
        )
    }

    fn press_keys(&mut self, chord: &KeyChord) -> PageResult<()> {
        let modifiers: Vec<ModifierKey> = chord
            .modifiers
            .iter()
            .map(|m| match m {
                Modifier::Alt => ModifierKey::Alt,
                Modifier::Control => ModifierKey::Ctrl,
                Modifier::Meta => ModifierKey::Meta,
                Modifier::Shift => ModifierKey::Shift,
            })
            .collect();

        let result = if modifiers.is_empty() {
            self.tab.press_key(&chord.key)
        } else {
            self.tab
                .press_key_with_modifiers(&chord.key, Some(modifiers.as_slice()))
        };
        result.map_err(|e| page_err(&format!("key press {} failed", chord), e))?;
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> PageResult<()> {
        self.tab
            .type_str(text)
            .map_err(|e| page_err("typing failed", e))?;
        Ok(())
    }

    fn evaluate(&mut self, script: &str) -> PageResult<()> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| page_err("script evaluation failed", e))?;
        Ok(())
    }

    fn ready_state(&mut self) -> PageResult<String> {
        let remote = self
            .tab
            .evaluate("document.readyState", false)
            .map_err(|e| page_err("readyState probe failed", e))?;
        Ok(remote
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    fn screenshot_png(&mut self) -> PageResult<Vec<u8>> {
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| page_err("screenshot failed", e))
    }

    fn url(&mut self) -> PageResult<String> {
        Ok(self.tab.get_url())
    }

    fn close(&mut self) -> PageResult<()> {
        if let Some(browser) = self.browser.take() {
            if let Err(e) = self.tab.close(true) {
                log::debug!("Failed to close tab: {}", e);
            }
            // Dropping the Browser terminates the Chrome process
            drop(browser);
            log::info!("Browser closed");
        }
        Ok(())
    }
}
