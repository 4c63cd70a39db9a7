//! UI module for the tray context menu.
//!
//! The action model (command ids) is host-independent; the popup menu
//! itself is Win32-only.

pub mod actions;
#[cfg(windows)]
pub mod menu;

pub use actions::{command_id, decode_command, MenuAction};
