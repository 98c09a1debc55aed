//! Terminal UI for the detector client: an explicit state record, a pure
//! result renderer, and a message-driven event loop on top of
//! ratatui/crossterm.

mod clipboard;
mod command;
mod feeders;
pub mod render;
mod shutdown;
pub mod state;
mod styles;
mod tui;
mod view;

pub use shutdown::ShutdownHandle;
pub use tui::{App, UiMsg};
