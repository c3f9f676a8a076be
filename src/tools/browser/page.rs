//! The live page the executor drives

use crate::core::{PageError, PixelPoint};
use crate::tools::keys::KeyChord;

pub type PageResult<T> = std::result::Result<T, PageError>;

/// Low-level operations on the single page of a browser session.
///
/// Every call blocks until the browser has processed it. Points are
/// viewport pixels.
pub trait BrowserPage: Send {
    /// Load a URL and wait for the navigation to commit
    fn goto(&mut self, url: &str) -> PageResult<()>;

    fn go_back(&mut self) -> PageResult<()>;

    fn go_forward(&mut self) -> PageResult<()>;

    /// Left click at a point
    fn mouse_click(&mut self, at: PixelPoint) -> PageResult<()>;

    /// Move the pointer without pressing
    fn mouse_move(&mut self, to: PixelPoint) -> PageResult<()>;

    /// Press the left button at a point
    fn mouse_down(&mut self, at: PixelPoint) -> PageResult<()>;

    /// Release the left button at a point
    fn mouse_up(&mut self, at: PixelPoint) -> PageResult<()>;

    /// Dispatch a wheel event at a point
    fn mouse_wheel(&mut self, at: PixelPoint, delta_x: i64, delta_y: i64) -> PageResult<()>;

    fn press_keys(&mut self, chord: &KeyChord) -> PageResult<()>;

    /// Type text into whatever has focus
    fn type_text(&mut self, text: &str) -> PageResult<()>;

    /// Run a script for its side effects
    fn evaluate(&mut self, script: &str) -> PageResult<()>;

    /// Current `document.readyState`
    fn ready_state(&mut self) -> PageResult<String>;

    /// PNG of the visible viewport
    fn screenshot_png(&mut self) -> PageResult<Vec<u8>>;

    fn url(&mut self) -> PageResult<String>;

    /// Release the browser. Further calls may fail.
    fn close(&mut self) -> PageResult<()>;
}
