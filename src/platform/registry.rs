//! "Start with Windows" registry entry.
//!
//! Managed as a value under the HKCU Run key pointing at the current
//! executable.

use thiserror::Error;
use windows::core::PCWSTR;
use windows::Win32::System::Registry::{
    RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
    HKEY_CURRENT_USER, KEY_READ, KEY_WRITE, REG_SZ,
};

/// Registry error types.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to open Run key")]
    RunKeyUnavailable,

    #[error("Failed to write startup entry")]
    WriteFailed,

    #[error("Executable path unavailable")]
    ExePathUnavailable,
}

/// The HKCU Run-key entry for this executable.
pub struct StartupEntry {
    run_key_path: Vec<u16>,
    value_name: Vec<u16>,
}

impl StartupEntry {
    const RUN_KEY: &'static str = r"Software\Microsoft\Windows\CurrentVersion\Run";
    const APP_NAME: &'static str = "AudioSwitcher";

    pub fn new() -> Self {
        Self {
            run_key_path: Self::to_wide(Self::RUN_KEY),
            value_name: Self::to_wide(Self::APP_NAME),
        }
    }

    fn to_wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    /// Check if the startup entry exists.
    pub fn is_enabled(&self) -> bool {
        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.run_key_path.as_ptr()),
                0,
                KEY_READ,
                &mut hkey,
            );

            if result.is_err() {
                return false;
            }

            let exists = RegQueryValueExW(
                hkey,
                PCWSTR::from_raw(self.value_name.as_ptr()),
                None,
                None,
                None,
                None,
            )
            .is_ok();

            let _ = RegCloseKey(hkey);

            exists
        }
    }

    /// Create or delete the startup entry.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), StartupError> {
        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.run_key_path.as_ptr()),
                0,
                KEY_WRITE,
                &mut hkey,
            );

            if result.is_err() {
                return Err(StartupError::RunKeyUnavailable);
            }

            let result = if enabled {
                let exe_path = match std::env::current_exe() {
                    Ok(path) => path,
                    Err(_) => {
                        let _ = RegCloseKey(hkey);
                        return Err(StartupError::ExePathUnavailable);
                    }
                };
                let exe_path_wide = Self::to_wide(&exe_path.to_string_lossy());

                RegSetValueExW(
                    hkey,
                    PCWSTR::from_raw(self.value_name.as_ptr()),
                    0,
                    REG_SZ,
                    Some(std::slice::from_raw_parts(
                        exe_path_wide.as_ptr() as *const u8,
                        exe_path_wide.len() * 2,
                    )),
                )
            } else {
                RegDeleteValueW(hkey, PCWSTR::from_raw(self.value_name.as_ptr()))
            };

            let _ = RegCloseKey(hkey);

            // Deleting an entry that was never written is not a failure
            if result.is_err() && enabled {
                Err(StartupError::WriteFailed)
            } else {
                Ok(())
            }
        }
    }

    /// Flip the entry. Returns the new state.
    pub fn toggle(&self) -> bool {
        let target = !self.is_enabled();
        if let Err(e) = self.set_enabled(target) {
            tracing::warn!(error = %e, "failed to toggle startup entry");
            return self.is_enabled();
        }
        target
    }
}

impl Default for StartupEntry {
    fn default() -> Self {
        Self::new()
    }
}
