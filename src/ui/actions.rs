//! Data-driven menu command model.
//!
//! Menu items carry plain `u32` command ids from disjoint ranges instead of
//! per-item callbacks; `WM_COMMAND` decodes an id back into the action it
//! stands for. Device-bound actions encode the device's index into the
//! cached list.

use crate::config::FavoriteSlot;

// Fixed command IDs
pub const CMD_EXIT: u32 = 1;
pub const CMD_REFRESH: u32 = 2;
pub const CMD_TOGGLE_STARTUP: u32 = 3;

// Index-carrying ranges, 900 devices per range
pub const CMD_DEVICE_BASE: u32 = 100;
pub const CMD_FAVORITE1_BASE: u32 = 1000;
pub const CMD_FAVORITE2_BASE: u32 = 2000;
const CMD_FAVORITE2_END: u32 = 3000;

/// An action a menu item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Make the device at this index the system default
    SelectDevice(usize),

    /// Assign the device at this index to a favorite slot
    AssignFavorite(FavoriteSlot, usize),

    /// Re-run device enumeration and rebuild state
    Refresh,

    /// Toggle the "Start with Windows" registry entry
    ToggleStartup,

    /// Quit the application
    Exit,
}

/// The command id a menu item for this action is created with.
pub fn command_id(action: MenuAction) -> u32 {
    match action {
        MenuAction::SelectDevice(index) => CMD_DEVICE_BASE + index as u32,
        MenuAction::AssignFavorite(FavoriteSlot::One, index) => CMD_FAVORITE1_BASE + index as u32,
        MenuAction::AssignFavorite(FavoriteSlot::Two, index) => CMD_FAVORITE2_BASE + index as u32,
        MenuAction::Refresh => CMD_REFRESH,
        MenuAction::ToggleStartup => CMD_TOGGLE_STARTUP,
        MenuAction::Exit => CMD_EXIT,
    }
}

/// Decode a `WM_COMMAND` id back into its action.
pub fn decode_command(id: u32) -> Option<MenuAction> {
    match id {
        CMD_EXIT => Some(MenuAction::Exit),
        CMD_REFRESH => Some(MenuAction::Refresh),
        CMD_TOGGLE_STARTUP => Some(MenuAction::ToggleStartup),
        id if (CMD_DEVICE_BASE..CMD_FAVORITE1_BASE).contains(&id) => {
            Some(MenuAction::SelectDevice((id - CMD_DEVICE_BASE) as usize))
        }
        id if (CMD_FAVORITE1_BASE..CMD_FAVORITE2_BASE).contains(&id) => Some(
            MenuAction::AssignFavorite(FavoriteSlot::One, (id - CMD_FAVORITE1_BASE) as usize),
        ),
        id if (CMD_FAVORITE2_BASE..CMD_FAVORITE2_END).contains(&id) => Some(
            MenuAction::AssignFavorite(FavoriteSlot::Two, (id - CMD_FAVORITE2_BASE) as usize),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ids_decode_back_to_their_actions() {
        let actions = [
            MenuAction::Exit,
            MenuAction::Refresh,
            MenuAction::ToggleStartup,
            MenuAction::SelectDevice(0),
            MenuAction::SelectDevice(7),
            MenuAction::AssignFavorite(FavoriteSlot::One, 3),
            MenuAction::AssignFavorite(FavoriteSlot::Two, 0),
        ];

        for action in actions {
            assert_eq!(decode_command(command_id(action)), Some(action));
        }
    }

    #[test]
    fn unknown_ids_decode_to_none() {
        assert_eq!(decode_command(0), None);
        assert_eq!(decode_command(42), None);
        assert_eq!(decode_command(CMD_FAVORITE2_END), None);
    }

    #[test]
    fn index_ranges_do_not_collide() {
        let select = command_id(MenuAction::SelectDevice(899));
        let fav1 = command_id(MenuAction::AssignFavorite(FavoriteSlot::One, 0));
        assert!(select < fav1);
    }
}
