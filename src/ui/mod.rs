//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling for browse, search and dialogs
//! - `events` - Background task event processing
//! - `render` - Layout and overlay dispatch
//! - `helpers` - Task spawning and browser launch
//! - `articles` - Header, filter bar, article cards and pager
//! - `contact` - Contact form overlay
//! - `help` - Keybinding overlay
//! - `status` - Status bar widget

mod articles;
mod contact;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
