//! Audio device data models.
//!
//! Defines the output device representation, the Windows audio roles, the
//! audio error type, and the narrow capability interface through which the
//! default endpoint is changed.

use thiserror::Error;

/// An active audio render endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDevice {
    /// Unique Windows device ID (opaque string from IMMDevice::GetId)
    pub id: String,

    /// Human-readable device name, never empty (a synthetic fallback is
    /// assigned during enumeration if the property store has none)
    pub name: String,
}

impl OutputDevice {
    pub fn new(id: String, name: String) -> Self {
        Self { id, name }
    }
}

/// Audio device role (maps to the Windows ERole enum).
///
/// Each role can carry its own default device; this application forces all
/// three to the same endpoint so every subsystem that asks for "the
/// default" gets the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceRole {
    /// Games, system sounds, most general applications
    Console = 0,

    /// Music players, video players
    Multimedia = 1,

    /// Teams, Zoom, Discord, and other VoIP applications
    Communications = 2,
}

impl DeviceRole {
    /// All roles, in the order they are forced to the new default.
    pub const ALL: [DeviceRole; 3] = [
        DeviceRole::Console,
        DeviceRole::Multimedia,
        DeviceRole::Communications,
    ];
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Device not found: {device_id}")]
    DeviceNotFound { device_id: String },

    #[cfg(windows)]
    #[error("COM initialization failed: {0}")]
    ComInitFailed(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Failed to enumerate devices: {0}")]
    EnumerationFailed(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Policy configuration interface unavailable: {0}")]
    PolicyUnavailable(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Failed to set default device: {0}")]
    SetDefaultFailed(#[source] windows::core::Error),
}

/// Capability to change the system default render endpoint for one role.
///
/// The only implementation outside of tests goes through the undocumented
/// PolicyConfig COM class; keeping the surface to this single method means
/// nothing else has to change if that mechanism is ever replaced.
pub trait DefaultEndpointSetter {
    fn set_default_endpoint(&self, device_id: &str, role: DeviceRole) -> Result<(), AudioError>;
}

/// Make `device_id` the default endpoint for every role, best-effort.
///
/// Each role is attempted independently; a failure on one role is logged
/// and does not abort the remaining roles. Returns whether any role was
/// set.
pub fn set_default_for_all_roles(setter: &dyn DefaultEndpointSetter, device_id: &str) -> bool {
    let mut any_succeeded = false;

    for role in DeviceRole::ALL {
        match setter.set_default_endpoint(device_id, role) {
            Ok(()) => any_succeeded = true,
            Err(e) => {
                tracing::warn!(device_id, ?role, error = %e, "failed to set default endpoint");
            }
        }
    }

    any_succeeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every role attempted, optionally failing some of them.
    struct RecordingSetter {
        attempts: RefCell<Vec<DeviceRole>>,
        fail_roles: Vec<DeviceRole>,
    }

    impl RecordingSetter {
        fn failing_on(fail_roles: Vec<DeviceRole>) -> Self {
            Self {
                attempts: RefCell::new(Vec::new()),
                fail_roles,
            }
        }
    }

    impl DefaultEndpointSetter for RecordingSetter {
        fn set_default_endpoint(
            &self,
            device_id: &str,
            role: DeviceRole,
        ) -> Result<(), AudioError> {
            self.attempts.borrow_mut().push(role);
            if self.fail_roles.contains(&role) {
                Err(AudioError::DeviceNotFound {
                    device_id: device_id.to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn all_roles_attempted_when_first_fails() {
        let setter = RecordingSetter::failing_on(vec![DeviceRole::Console]);
        let succeeded = set_default_for_all_roles(&setter, "{dev-a}");

        assert!(succeeded);
        assert_eq!(setter.attempts.borrow().as_slice(), &DeviceRole::ALL);
    }

    #[test]
    fn reports_failure_when_every_role_fails() {
        let setter = RecordingSetter::failing_on(DeviceRole::ALL.to_vec());
        let succeeded = set_default_for_all_roles(&setter, "{dev-a}");

        assert!(!succeeded);
        assert_eq!(setter.attempts.borrow().len(), 3);
    }
}
