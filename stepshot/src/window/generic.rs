use super::{ActiveWindow, WindowInspector};
use tracing::debug;

/// Cross-platform inspector: scans `xcap`'s window list for the focused
/// window and reads its title and application name.
pub struct GenericInspector;

impl GenericInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenericInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowInspector for GenericInspector {
    fn active_window(&self) -> ActiveWindow {
        let windows = match xcap::Window::all() {
            Ok(windows) => windows,
            Err(e) => {
                debug!("Failed to enumerate windows: {}", e);
                return ActiveWindow::default();
            }
        };

        let Some(focused) = windows.iter().find(|w| w.is_focused().unwrap_or(false)) else {
            return ActiveWindow::default();
        };

        ActiveWindow {
            title: focused.title().map(|t| t.trim().to_string()).unwrap_or_default(),
            app_name: focused.app_name().unwrap_or_default(),
        }
    }
}
