//! Browser automation module
//!
//! The page abstraction the executor drives, and its Chrome implementation.

mod chrome;
mod page;

pub use chrome::ChromeSession;
pub use page::{BrowserPage, PageResult};
