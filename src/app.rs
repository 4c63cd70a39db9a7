//! Application state and message loop.
//!
//! A hidden window owns the tray icon and receives every event: tray
//! clicks, menu commands, and device-change notifications. All state lives
//! on this one thread; the window procedure is the only dispatcher.

use crate::audio::enumerator::{self, ComGuard};
use crate::audio::notifications::NotificationRegistration;
use crate::audio::policy::PolicyConfigClient;
use crate::audio::{set_default_for_all_roles, OutputDevice};
use crate::config::{FavoriteSlot, PreferenceStore, Preferences};
use crate::platform::StartupEntry;
use crate::tray::TrayIcon;
use crate::ui::{self, MenuAction};
use std::cell::RefCell;
use std::rc::Rc;
use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetCursorPos, GetMessageW,
    MessageBoxW, PostQuitMessage, RegisterClassExW, SetForegroundWindow, TranslateMessage,
    CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, MB_ICONERROR, MB_OK, MSG, WINDOW_EX_STYLE, WM_COMMAND,
    WM_DESTROY, WM_LBUTTONUP, WM_RBUTTONUP, WM_USER, WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
};

pub const WM_TRAY_ICON: u32 = WM_USER + 1;
pub const WM_DEVICE_CHANGED: u32 = WM_USER + 2;

/// Fatal-path message box; the only dialog this application ever shows,
/// reachable only before the tray icon exists.
fn show_error(msg: &str) {
    unsafe {
        let msg_wide: Vec<u16> = msg.encode_utf16().chain(std::iter::once(0)).collect();
        let title_wide: Vec<u16> = "Audio Switcher Error"
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();
        MessageBoxW(
            None,
            windows::core::PCWSTR(msg_wide.as_ptr()),
            windows::core::PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

/// Run the application: hidden window, tray icon, message loop.
pub fn run() -> anyhow::Result<()> {
    unsafe {
        let _com = match ComGuard::new() {
            Ok(guard) => guard,
            Err(e) => {
                show_error(&format!("COM init failed: {e}"));
                return Err(e.into());
            }
        };

        let instance = GetModuleHandleW(None)?;

        let window_class = w!("AudioSwitcherWindow");
        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(window_proc),
            hInstance: instance.into(),
            lpszClassName: window_class,
            ..Default::default()
        };

        RegisterClassExW(&wc);

        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            window_class,
            w!("Audio Switcher"),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            None,
            None,
            instance,
            None,
        )?;

        let app_state = match AppState::new(hwnd) {
            Ok(state) => Rc::new(RefCell::new(state)),
            Err(e) => {
                show_error(&format!("App init failed: {e:?}"));
                return Err(e);
            }
        };
        APP_STATE.with(|state| *state.borrow_mut() = Some(app_state));

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).into() {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        // The notification registration must unregister before the ComGuard
        // uninitializes COM.
        APP_STATE.with(|state| *state.borrow_mut() = None);
    }

    Ok(())
}

struct AppState {
    hwnd: HWND,
    store: PreferenceStore,
    prefs: Preferences,
    devices: Vec<OutputDevice>,
    tray_icon: TrayIcon,
    startup: StartupEntry,
    _notifications: Option<NotificationRegistration>,
}

impl AppState {
    fn new(hwnd: HWND) -> anyhow::Result<Self> {
        let store = PreferenceStore::beside_executable();
        let prefs = store.load();
        let devices = enumerator::list_output_devices();
        let tray_icon = TrayIcon::new(hwnd, &tooltip_text(&devices))?;

        let notifications = match NotificationRegistration::new(hwnd, WM_DEVICE_CHANGED) {
            Ok(reg) => Some(reg),
            Err(e) => {
                tracing::warn!(error = %e, "device notifications unavailable");
                None
            }
        };

        Ok(Self {
            hwnd,
            store,
            prefs,
            devices,
            tray_icon,
            startup: StartupEntry::new(),
            _notifications: notifications,
        })
    }

    /// Re-run enumeration and refresh the tooltip.
    fn refresh_devices(&mut self) {
        self.devices = enumerator::list_output_devices();
        self.update_tray();
    }

    fn update_tray(&mut self) {
        self.tray_icon.update_tooltip(&tooltip_text(&self.devices));
    }

    /// Left-click gesture: switch to whichever favorite the toggle policy
    /// picks. Does nothing unless both favorites are assigned.
    fn toggle_favorites(&mut self) {
        let current = enumerator::default_output_id();
        let target = match self.prefs.toggle_target(current.as_deref()) {
            Some(target) => target.to_string(),
            None => {
                tracing::debug!("toggle ignored: favorites not fully assigned");
                return;
            }
        };
        self.set_default_device(&target);
    }

    /// Force `device_id` to be the default for every role. A stale id is
    /// attempted anyway; the OS call fails silently.
    fn set_default_device(&mut self, device_id: &str) {
        set_default_for_all_roles(&PolicyConfigClient, device_id);
        self.update_tray();
    }

    fn select_device(&mut self, index: usize) {
        if let Some(device) = self.devices.get(index) {
            let id = device.id.clone();
            self.set_default_device(&id);
        }
    }

    /// Assign the device at `index` to a favorite slot and persist
    /// immediately.
    fn set_favorite(&mut self, slot: FavoriteSlot, index: usize) {
        if let Some(device) = self.devices.get(index) {
            self.prefs.set_favorite(slot, device.id.clone());
            self.store.save(&self.prefs);
        }
    }

    fn show_menu(&self, x: i32, y: i32) {
        let default_id = enumerator::default_output_id();
        ui::menu::show_context_menu(
            self.hwnd,
            x,
            y,
            &self.devices,
            &self.prefs,
            default_id.as_deref(),
            self.startup.is_enabled(),
        );
    }
}

/// Tray tooltip: the current default device, when it resolves.
fn tooltip_text(devices: &[OutputDevice]) -> String {
    let default_name = enumerator::default_output_id()
        .and_then(|id| devices.iter().find(|d| d.id == id).map(|d| d.name.clone()));

    match default_name {
        Some(name) => format!("Audio Switcher - {name}"),
        None => "Audio Switcher".to_string(),
    }
}

thread_local! {
    static APP_STATE: RefCell<Option<Rc<RefCell<AppState>>>> = const { RefCell::new(None) };
}

/// Run `f` against the app state unless it is gone or already borrowed
/// (a device notification can land while the menu's modal loop is live).
fn with_app_state<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut AppState) -> R,
{
    APP_STATE.with(|state| {
        let slot = state.borrow();
        let app = slot.as_ref()?;
        let mut app = app.try_borrow_mut().ok()?;
        Some(f(&mut app))
    })
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_TRAY_ICON => {
            let event = (lparam.0 & 0xFFFF) as u32;
            match event {
                WM_LBUTTONUP => {
                    // Left click - toggle between favorites
                    with_app_state(|app| app.toggle_favorites());
                }
                WM_RBUTTONUP => {
                    // Right click - show context menu
                    let mut pt = POINT::default();
                    let _ = GetCursorPos(&mut pt);
                    let _ = SetForegroundWindow(hwnd);
                    with_app_state(|app| app.show_menu(pt.x, pt.y));
                }
                _ => {}
            }
            LRESULT(0)
        }
        WM_DEVICE_CHANGED => {
            with_app_state(|app| app.refresh_devices());
            LRESULT(0)
        }
        WM_COMMAND => {
            let cmd_id = (wparam.0 & 0xFFFF) as u32;
            handle_menu_command(cmd_id);
            LRESULT(0)
        }
        WM_DESTROY => {
            with_app_state(|app| app.tray_icon.remove());
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

fn handle_menu_command(cmd_id: u32) {
    let action = match ui::decode_command(cmd_id) {
        Some(action) => action,
        None => return,
    };

    match action {
        MenuAction::Exit => unsafe {
            with_app_state(|app| {
                let _ = DestroyWindow(app.hwnd);
            });
        },
        MenuAction::Refresh => {
            with_app_state(|app| app.refresh_devices());
        }
        MenuAction::ToggleStartup => {
            with_app_state(|app| app.startup.toggle());
        }
        MenuAction::SelectDevice(index) => {
            with_app_state(|app| app.select_device(index));
        }
        MenuAction::AssignFavorite(slot, index) => {
            with_app_state(|app| app.set_favorite(slot, index));
        }
    }
}
