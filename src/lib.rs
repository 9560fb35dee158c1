//! newsdeck: a terminal news feed reader.
//!
//! Loads a JSON article feed, then lets the user filter, search and page
//! through it, open articles in the browser and send a contact message.

pub mod app;
pub mod config;
pub mod contact;
pub mod feed;
pub mod keybindings;
pub mod logging;
pub mod theme;
pub mod ui;
pub mod util;
