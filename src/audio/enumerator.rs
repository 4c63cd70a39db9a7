//! Render endpoint enumeration using the Windows MMDevice API.
//!
//! Every query creates its own `IMMDeviceEnumerator` and releases it on
//! return; nothing is cached across calls, so hot-plugged devices never
//! leave a stale handle behind.

use super::device::{AudioError, OutputDevice};
use super::filter;
use windows::Win32::Devices::Properties::DEVPKEY_Device_FriendlyName;
use windows::Win32::Media::Audio::{
    eMultimedia, eRender, IMMDevice, IMMDeviceEnumerator, MMDeviceEnumerator, DEVICE_STATE_ACTIVE,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED, STGM,
};
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};

/// COM initialization guard that uninitializes COM on drop.
pub struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    /// Initialize COM for the current thread.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            // Apartment-threaded to match the message loop
            CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                .ok()
                .map_err(AudioError::ComInitFailed)?;
        }
        Ok(Self { initialized: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe {
                CoUninitialize();
            }
        }
    }
}

/// List all active render endpoints, filtered and named for display.
///
/// Returns an empty list on any enumeration failure; "no devices" is a
/// state the menu knows how to show.
pub fn list_output_devices() -> Vec<OutputDevice> {
    match enumerate_render_endpoints() {
        Ok(raw) => filter::refine_device_list(raw),
        Err(e) => {
            tracing::warn!(error = %e, "device enumeration failed");
            Vec::new()
        }
    }
}

/// Get the id of the current default render endpoint (multimedia role).
///
/// Returns `None` when there is no default device or the query fails.
pub fn default_output_id() -> Option<String> {
    unsafe {
        let enumerator: IMMDeviceEnumerator =
            CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL).ok()?;
        let device = enumerator.GetDefaultAudioEndpoint(eRender, eMultimedia).ok()?;
        let id = device.GetId().ok()?;
        id.to_string().ok()
    }
}

/// Collect raw `(id, name)` pairs for all active render endpoints.
fn enumerate_render_endpoints() -> Result<Vec<(String, String)>, AudioError> {
    unsafe {
        let enumerator: IMMDeviceEnumerator =
            CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                .map_err(AudioError::EnumerationFailed)?;

        let collection = enumerator
            .EnumAudioEndpoints(eRender, DEVICE_STATE_ACTIVE)
            .map_err(AudioError::EnumerationFailed)?;

        let count = collection
            .GetCount()
            .map_err(AudioError::EnumerationFailed)?;

        let mut raw = Vec::with_capacity(count as usize);

        for i in 0..count {
            let device = match collection.Item(i) {
                Ok(d) => d,
                Err(_) => continue,
            };

            let Some(id) = device_id(&device) else {
                continue;
            };

            raw.push((id, friendly_name(&device).unwrap_or_default()));
        }

        Ok(raw)
    }
}

fn device_id(device: &IMMDevice) -> Option<String> {
    unsafe {
        let id = device.GetId().ok()?;
        id.to_string().ok()
    }
}

/// Friendly name from the device property store, if one is set.
fn friendly_name(device: &IMMDevice) -> Option<String> {
    unsafe {
        let props: IPropertyStore = device.OpenPropertyStore(STGM(0)).ok()?;

        // Convert DEVPROPKEY to PROPERTYKEY
        let key = PROPERTYKEY {
            fmtid: DEVPKEY_Device_FriendlyName.fmtid,
            pid: DEVPKEY_Device_FriendlyName.pid,
        };

        let prop = props.GetValue(&key).ok()?;
        let name = prop.to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}
