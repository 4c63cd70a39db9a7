//! Audio Output Switcher - Library
//!
//! A system tray utility for switching the default audio output device on
//! Windows.
//!
//! ## Features
//!
//! - Left-click the tray icon to toggle between two favorite devices
//! - Right-click for a menu of all active output devices
//! - Assign favorites from per-slot submenus; persisted as JSON beside the
//!   executable
//! - Default endpoint forced across the Console, Multimedia, and
//!   Communications roles
//! - Start with Windows option

pub mod audio;
pub mod config;
pub mod ui;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub mod platform;
#[cfg(windows)]
pub mod tray;

pub use audio::{AudioError, DefaultEndpointSetter, DeviceRole, OutputDevice};
pub use config::{FavoriteSlot, PreferenceStore, Preferences};
