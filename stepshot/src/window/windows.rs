use super::{ActiveWindow, WindowInspector};
use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId,
};

/// Windows-native inspector: foreground window via Win32, owning process
/// name via `sysinfo`.
pub struct WindowsInspector {
    system: Mutex<System>,
}

impl WindowsInspector {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    fn process_name(&self, pid: u32) -> String {
        let mut system = match self.system.lock() {
            Ok(system) => system,
            Err(e) => {
                debug!("Process table lock poisoned: {}", e);
                return String::new();
            }
        };
        let pid = Pid::from_u32(pid);
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing(),
        );
        system
            .process(pid)
            .map(|p| p.name().to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Default for WindowsInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowInspector for WindowsInspector {
    fn active_window(&self) -> ActiveWindow {
        let hwnd: HWND = unsafe { GetForegroundWindow() };
        if hwnd.is_invalid() {
            return ActiveWindow::default();
        }

        let mut buf = [0u16; 512];
        let len = unsafe { GetWindowTextW(hwnd, &mut buf) } as usize;
        let title = String::from_utf16_lossy(&buf[..len.min(buf.len())])
            .trim()
            .to_string();

        let mut pid: u32 = 0;
        unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
        let app_name = if pid != 0 {
            self.process_name(pid)
        } else {
            String::new()
        };

        ActiveWindow { title, app_name }
    }
}
