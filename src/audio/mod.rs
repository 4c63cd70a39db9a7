//! Audio module for Windows Core Audio API interactions.
//!
//! Render endpoint enumeration, default-device queries, and default-device
//! switching through the PolicyConfig interface. The device model, the
//! name blacklist, and the role fan-out are host-independent; only the COM
//! plumbing is Windows-only.

pub mod device;
pub mod filter;

#[cfg(windows)]
pub mod enumerator;
#[cfg(windows)]
pub mod notifications;
#[cfg(windows)]
pub mod policy;

pub use device::{
    set_default_for_all_roles, AudioError, DefaultEndpointSetter, DeviceRole, OutputDevice,
};
#[cfg(windows)]
pub use enumerator::ComGuard;
