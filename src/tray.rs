use crate::app::WM_TRAY_ICON;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::Shell::*;
use windows::Win32::UI::WindowsAndMessaging::*;

const TRAY_ICON_ID: u32 = 1;

/// Manages the system tray icon
pub struct TrayIcon {
    hwnd: HWND,
    icon: HICON,
}

impl TrayIcon {
    pub fn new(hwnd: HWND, tooltip: &str) -> Result<Self> {
        // Try to draw the swap icon, fall back to the stock application icon
        let icon = match create_switch_icon() {
            Ok(icon) => icon,
            Err(_) => unsafe { LoadIconW(None, IDI_APPLICATION)? },
        };

        let tray = Self { hwnd, icon };
        tray.add(tooltip)?;

        Ok(tray)
    }

    fn add(&self, tooltip: &str) -> Result<()> {
        let mut nid = NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: self.hwnd,
            uID: TRAY_ICON_ID,
            uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP | NIF_SHOWTIP,
            uCallbackMessage: WM_TRAY_ICON,
            hIcon: self.icon,
            ..Default::default()
        };
        Self::write_tooltip(&mut nid, tooltip);

        unsafe {
            if !Shell_NotifyIconW(NIM_ADD, &nid).as_bool() {
                let err = GetLastError();
                return Err(Error::new(
                    HRESULT::from_win32(err.0),
                    "Shell_NotifyIconW failed",
                ));
            }

            // Set version for modern behavior
            nid.Anonymous.uVersion = NOTIFYICON_VERSION_4;
            let _ = Shell_NotifyIconW(NIM_SETVERSION, &nid);
        }

        Ok(())
    }

    /// Update the tooltip (shows the current default device).
    pub fn update_tooltip(&mut self, tooltip: &str) {
        let mut nid = NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: self.hwnd,
            uID: TRAY_ICON_ID,
            uFlags: NIF_TIP | NIF_SHOWTIP,
            ..Default::default()
        };
        Self::write_tooltip(&mut nid, tooltip);

        unsafe {
            let _ = Shell_NotifyIconW(NIM_MODIFY, &nid);
        }
    }

    fn write_tooltip(nid: &mut NOTIFYICONDATAW, tooltip: &str) {
        let tooltip_wide: Vec<u16> = tooltip.encode_utf16().chain(std::iter::once(0)).collect();
        let len = std::cmp::min(tooltip_wide.len(), nid.szTip.len());
        nid.szTip[..len].copy_from_slice(&tooltip_wide[..len]);
        if let Some(last) = nid.szTip.last_mut() {
            *last = 0;
        }
    }

    pub fn remove(&self) {
        let nid = NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: self.hwnd,
            uID: TRAY_ICON_ID,
            ..Default::default()
        };

        unsafe {
            let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
        }
    }
}

/// Draw the swap icon: two opposing horizontal arrows
fn create_switch_icon() -> Result<HICON> {
    unsafe {
        let size = 16i32;

        // Create a device context and bitmap for the icon
        let screen_dc = GetDC(None);
        if screen_dc.is_invalid() {
            return Err(Error::from_win32());
        }

        let mem_dc = CreateCompatibleDC(screen_dc);
        if mem_dc.is_invalid() {
            ReleaseDC(None, screen_dc);
            return Err(Error::from_win32());
        }

        let bitmap = CreateCompatibleBitmap(screen_dc, size, size);
        if bitmap.is_invalid() {
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);
            return Err(Error::from_win32());
        }

        let old_bitmap = SelectObject(mem_dc, bitmap);

        // Fill background with black (transparent)
        let black_brush = GetStockObject(BLACK_BRUSH);
        let rect = RECT {
            left: 0,
            top: 0,
            right: size,
            bottom: size,
        };
        FillRect(mem_dc, &rect, HBRUSH(black_brush.0));

        let white = COLORREF(0x00FFFFFF);
        let pen = CreatePen(PS_SOLID, 2, white);
        let brush = CreateSolidBrush(white);
        let old_pen = SelectObject(mem_dc, pen);
        let old_brush = SelectObject(mem_dc, brush);

        // Top arrow, pointing right
        let _ = MoveToEx(mem_dc, 2, 5, None);
        let _ = LineTo(mem_dc, 10, 5);
        let top_head = [
            POINT { x: 13, y: 5 },
            POINT { x: 9, y: 2 },
            POINT { x: 9, y: 8 },
        ];
        let _ = Polygon(mem_dc, &top_head);

        // Bottom arrow, pointing left
        let _ = MoveToEx(mem_dc, 6, 11, None);
        let _ = LineTo(mem_dc, 14, 11);
        let bottom_head = [
            POINT { x: 2, y: 11 },
            POINT { x: 6, y: 8 },
            POINT { x: 6, y: 14 },
        ];
        let _ = Polygon(mem_dc, &bottom_head);

        SelectObject(mem_dc, old_pen);
        SelectObject(mem_dc, old_brush);
        let _ = DeleteObject(pen);
        let _ = DeleteObject(brush);

        SelectObject(mem_dc, old_bitmap);

        // Create mask bitmap (all zeros = all opaque for color icon)
        let mask = CreateBitmap(size, size, 1, 1, None);
        if mask.is_invalid() {
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);
            return Err(Error::from_win32());
        }

        let mask_dc = CreateCompatibleDC(screen_dc);
        let old_mask = SelectObject(mask_dc, mask);
        let black_brush2 = GetStockObject(BLACK_BRUSH);
        FillRect(mask_dc, &rect, HBRUSH(black_brush2.0));
        SelectObject(mask_dc, old_mask);
        let _ = DeleteDC(mask_dc);

        let _ = DeleteDC(mem_dc);
        ReleaseDC(None, screen_dc);

        // Create icon from bitmaps
        let icon_info = ICONINFO {
            fIcon: TRUE,
            xHotspot: 0,
            yHotspot: 0,
            hbmMask: mask,
            hbmColor: bitmap,
        };

        let icon = CreateIconIndirect(&icon_info)?;

        let _ = DeleteObject(bitmap);
        let _ = DeleteObject(mask);

        Ok(icon)
    }
}
