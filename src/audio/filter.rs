//! Name-based filtering of enumerated endpoints.
//!
//! Some drivers report capture jacks as render-capable, so the flow filter
//! alone is not enough. A fixed substring blacklist catches endpoints whose
//! friendly name marks them as inputs. The list lives here, in one place;
//! extend it when a new driver label shows up.

use super::device::OutputDevice;

/// Case-insensitive substrings identifying input devices mislabeled as
/// outputs. Includes the Realtek jack labels seen in the wild.
pub const INPUT_LABEL_PATTERNS: &[&str] = &[
    "Microphone",
    "Mic",
    "Input",
    "Line In",
    "Rear Green In",
    "Rear Blue In",
    "Front Green In",
    "Front Pink In",
    "Rear Pink In",
];

/// True if the friendly name matches the input blacklist.
pub fn looks_like_input(name: &str) -> bool {
    let lowered = name.to_lowercase();
    INPUT_LABEL_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(&pattern.to_lowercase()))
}

/// Turn raw `(id, name)` pairs into the final device list.
///
/// Skips entries with an empty id, drops blacklisted names, and assigns a
/// synthetic `"Device N"` name (N = 1-based position in the filtered
/// result) where the property store had none, so the menu never shows a
/// blank entry. Enumeration order is preserved.
pub fn refine_device_list(raw: impl IntoIterator<Item = (String, String)>) -> Vec<OutputDevice> {
    let mut devices = Vec::new();

    for (id, name) in raw {
        if id.is_empty() {
            continue;
        }
        if looks_like_input(&name) {
            continue;
        }

        let name = if name.is_empty() {
            format!("Device {}", devices.len() + 1)
        } else {
            name
        };

        devices.push(OutputDevice::new(id, name));
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, name: &str) -> (String, String) {
        (id.to_string(), name.to_string())
    }

    #[test]
    fn blacklist_matches_are_case_insensitive() {
        assert!(looks_like_input("Realtek MICROPHONE Array"));
        assert!(looks_like_input("rear green in (Realtek)"));
        assert!(looks_like_input("Line In at rear panel"));
        assert!(!looks_like_input("Speakers (Realtek High Definition Audio)"));
    }

    #[test]
    fn blacklisted_devices_are_excluded() {
        let devices = refine_device_list(vec![
            raw("{dev-a}", "Speakers"),
            raw("{dev-b}", "Microphone (USB)"),
            raw("{dev-c}", "Headphones"),
        ]);

        let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Speakers", "Headphones"]);
    }

    #[test]
    fn empty_ids_are_skipped() {
        let devices = refine_device_list(vec![raw("", "Speakers"), raw("{dev-a}", "Headphones")]);
        assert_eq!(devices.len(), 1);
        assert!(devices.iter().all(|d| !d.id.is_empty()));
    }

    #[test]
    fn blank_names_get_positional_fallbacks() {
        let devices = refine_device_list(vec![
            raw("{dev-a}", ""),
            raw("{dev-b}", "Mic In"),
            raw("{dev-c}", ""),
        ]);

        // Positions count within the filtered list, not the raw input.
        let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Device 1", "Device 2"]);
        assert!(devices.iter().all(|d| !d.name.is_empty()));
    }
}
