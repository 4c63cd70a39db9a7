//! Device change notifications using IMMNotificationClient.
//!
//! Callbacks arrive on an MMDevice worker thread; they are marshaled onto
//! the message loop with `PostMessageW` so all state mutation stays on the
//! UI thread.

use windows::core::{implement, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::Media::Audio::{
    eRender, EDataFlow, ERole, IMMDeviceEnumerator, IMMNotificationClient,
    IMMNotificationClient_Impl, MMDeviceEnumerator, DEVICE_STATE,
};
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};
use windows::Win32::UI::Shell::PropertiesSystem::PROPERTYKEY;
use windows::Win32::UI::WindowsAndMessaging::PostMessageW;
// Re-export windows_core so the implement macro can find it
#[allow(unused_imports)]
use windows_core;

/// Notification client that reposts render-device changes to a window.
#[implement(IMMNotificationClient)]
struct RenderNotificationClient {
    hwnd: HWND,
    message: u32,
}

impl RenderNotificationClient_Impl {
    fn notify_change(&self) {
        unsafe {
            let _ = PostMessageW(self.hwnd, self.message, WPARAM(0), LPARAM(0));
        }
    }
}

impl IMMNotificationClient_Impl for RenderNotificationClient_Impl {
    fn OnDeviceStateChanged(
        &self,
        _pwstrdeviceid: &PCWSTR,
        _dwnewstate: DEVICE_STATE,
    ) -> windows::core::Result<()> {
        self.notify_change();
        Ok(())
    }

    fn OnDeviceAdded(&self, _pwstrdeviceid: &PCWSTR) -> windows::core::Result<()> {
        self.notify_change();
        Ok(())
    }

    fn OnDeviceRemoved(&self, _pwstrdeviceid: &PCWSTR) -> windows::core::Result<()> {
        self.notify_change();
        Ok(())
    }

    fn OnDefaultDeviceChanged(
        &self,
        flow: EDataFlow,
        _role: ERole,
        _pwstrdefaultdeviceid: &PCWSTR,
    ) -> windows::core::Result<()> {
        // Only render devices matter here
        if flow == eRender {
            self.notify_change();
        }
        Ok(())
    }

    fn OnPropertyValueChanged(
        &self,
        _pwstrdeviceid: &PCWSTR,
        _key: &PROPERTYKEY,
    ) -> windows::core::Result<()> {
        Ok(())
    }
}

/// Keeps a notification client registered for the lifetime of the app.
///
/// The registering enumerator is held alive so the callback can be
/// unregistered on drop.
pub struct NotificationRegistration {
    enumerator: IMMDeviceEnumerator,
    client: IMMNotificationClient,
}

impl NotificationRegistration {
    /// Register for device notifications, posting `message` to `hwnd` on
    /// every relevant change.
    pub fn new(hwnd: HWND, message: u32) -> windows::core::Result<Self> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)?;

            let client: IMMNotificationClient =
                RenderNotificationClient { hwnd, message }.into();
            enumerator.RegisterEndpointNotificationCallback(&client)?;

            Ok(Self { enumerator, client })
        }
    }
}

impl Drop for NotificationRegistration {
    fn drop(&mut self) {
        unsafe {
            let _ = self
                .enumerator
                .UnregisterEndpointNotificationCallback(&self.client);
        }
    }
}
