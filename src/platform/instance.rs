//! Single-instance enforcement.
//!
//! On launch, any other running process with this executable's file name is
//! terminated so exactly one instance owns the tray icon and the
//! preference file. Everything here is best-effort: a process that cannot
//! be inspected or killed is skipped.

use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
    GetCurrentProcessId, OpenProcess, TerminateProcess, PROCESS_TERMINATE,
};

/// Terminate every other running instance of this executable.
pub fn terminate_other_instances() {
    let own_name = match current_exe_name() {
        Some(name) => name,
        None => return,
    };
    let own_pid = unsafe { GetCurrentProcessId() };

    unsafe {
        let snapshot = match CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!(error = %e, "process snapshot unavailable");
                return;
            }
        };

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let pid = entry.th32ProcessID;
                if pid != own_pid && entry_exe_name(&entry).eq_ignore_ascii_case(&own_name) {
                    terminate(pid);
                }

                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }

        let _ = CloseHandle(snapshot);
    }
}

fn current_exe_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn entry_exe_name(entry: &PROCESSENTRY32W) -> String {
    let len = entry
        .szExeFile
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(entry.szExeFile.len());
    String::from_utf16_lossy(&entry.szExeFile[..len])
}

fn terminate(pid: u32) {
    unsafe {
        let handle = match OpenProcess(PROCESS_TERMINATE, false, pid) {
            Ok(handle) => handle,
            Err(_) => return,
        };

        match TerminateProcess(handle, 0) {
            Ok(()) => tracing::info!(pid, "terminated previous instance"),
            Err(e) => tracing::debug!(pid, error = %e, "could not terminate previous instance"),
        }

        let _ = CloseHandle(handle);
    }
}
