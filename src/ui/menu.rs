//! Right-click context menu.
//!
//! Built fresh on every right-click from the cached device list, the
//! preferences, and the current default id: two favorite entries with
//! device submenus, the checkable device list, Refresh, Start with
//! Windows, Exit. Items carry the command ids from [`super::actions`].

use super::actions::{command_id, MenuAction};
use crate::audio::OutputDevice;
use crate::config::{FavoriteSlot, Preferences};
use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, TrackPopupMenu, HMENU, MF_CHECKED, MF_POPUP,
    MF_SEPARATOR, MF_STRING, TPM_RIGHTBUTTON,
};

/// Placeholder label for an unset (or no longer resolvable) favorite.
const NOT_SET_LABEL: &str = "(not set)";

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Resolve a device id against the cached list. A stale or unset id yields
/// `None`, never an error.
fn device_name<'a>(devices: &'a [OutputDevice], id: Option<&str>) -> Option<&'a str> {
    let id = id?;
    devices
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.name.as_str())
}

/// Label for a favorite entry, e.g. `Favorite 1: Speakers`.
fn favorite_label(slot: FavoriteSlot, prefs: &Preferences, devices: &[OutputDevice]) -> String {
    let name = device_name(devices, prefs.favorite(slot)).unwrap_or(NOT_SET_LABEL);
    format!("Favorite {}: {}", slot.number(), name)
}

/// Build the submenu assigning a favorite slot, checkmark on the currently
/// assigned device.
unsafe fn build_favorite_submenu(
    slot: FavoriteSlot,
    devices: &[OutputDevice],
    prefs: &Preferences,
) -> Option<HMENU> {
    let submenu = CreatePopupMenu().ok()?;

    for (i, device) in devices.iter().enumerate() {
        let flags = if prefs.favorite(slot) == Some(device.id.as_str()) {
            MF_STRING | MF_CHECKED
        } else {
            MF_STRING
        };

        let label = to_wide(&device.name);
        let id = command_id(MenuAction::AssignFavorite(slot, i)) as usize;
        let _ = AppendMenuW(submenu, flags, id, PCWSTR(label.as_ptr()));
    }

    Some(submenu)
}

/// Show the context menu at the specified position.
pub fn show_context_menu(
    hwnd: HWND,
    x: i32,
    y: i32,
    devices: &[OutputDevice],
    prefs: &Preferences,
    default_id: Option<&str>,
    startup_enabled: bool,
) {
    unsafe {
        let menu = match CreatePopupMenu() {
            Ok(menu) => menu,
            Err(_) => return,
        };

        // Favorite entries with assignment submenus
        for slot in [FavoriteSlot::One, FavoriteSlot::Two] {
            if let Some(submenu) = build_favorite_submenu(slot, devices, prefs) {
                let label = to_wide(&favorite_label(slot, prefs, devices));
                let _ = AppendMenuW(menu, MF_POPUP, submenu.0 as usize, PCWSTR(label.as_ptr()));
            }
        }

        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, None);

        // All active devices, checkmark on the current default
        for (i, device) in devices.iter().enumerate() {
            let flags = if default_id == Some(device.id.as_str()) {
                MF_STRING | MF_CHECKED
            } else {
                MF_STRING
            };

            let label = to_wide(&device.name);
            let id = command_id(MenuAction::SelectDevice(i)) as usize;
            let _ = AppendMenuW(menu, flags, id, PCWSTR(label.as_ptr()));
        }

        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, None);

        let refresh_label = to_wide("Refresh");
        let _ = AppendMenuW(
            menu,
            MF_STRING,
            command_id(MenuAction::Refresh) as usize,
            PCWSTR(refresh_label.as_ptr()),
        );

        let startup_flags = if startup_enabled {
            MF_STRING | MF_CHECKED
        } else {
            MF_STRING
        };
        let startup_label = to_wide("Start with Windows");
        let _ = AppendMenuW(
            menu,
            startup_flags,
            command_id(MenuAction::ToggleStartup) as usize,
            PCWSTR(startup_label.as_ptr()),
        );

        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, None);

        let exit_label = to_wide("Exit");
        let _ = AppendMenuW(
            menu,
            MF_STRING,
            command_id(MenuAction::Exit) as usize,
            PCWSTR(exit_label.as_ptr()),
        );

        // Show the menu; DestroyMenu tears down the submenus with it
        let _ = TrackPopupMenu(menu, TPM_RIGHTBUTTON, x, y, 0, hwnd, None);
        let _ = DestroyMenu(menu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<OutputDevice> {
        vec![
            OutputDevice::new("{dev-a}".to_string(), "Speakers".to_string()),
            OutputDevice::new("{dev-b}".to_string(), "Headphones".to_string()),
        ]
    }

    #[test]
    fn favorite_label_resolves_known_device() {
        let prefs = Preferences {
            favorite1: Some("{dev-b}".to_string()),
            favorite2: None,
        };
        assert_eq!(
            favorite_label(FavoriteSlot::One, &prefs, &devices()),
            "Favorite 1: Headphones"
        );
    }

    #[test]
    fn favorite_label_falls_back_for_unset_and_stale_ids() {
        let unset = Preferences::default();
        assert_eq!(
            favorite_label(FavoriteSlot::Two, &unset, &devices()),
            "Favorite 2: (not set)"
        );

        // An unplugged favorite keeps its id but no longer resolves.
        let stale = Preferences {
            favorite1: Some("{gone}".to_string()),
            favorite2: None,
        };
        assert_eq!(
            favorite_label(FavoriteSlot::One, &stale, &devices()),
            "Favorite 1: (not set)"
        );
    }
}
