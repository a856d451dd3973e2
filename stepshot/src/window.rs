//! Active-window lookup.
//!
//! Two inspector variants exist: a Windows-native one built on the Win32
//! foreground-window APIs and a generic one built on `xcap`'s focused-window
//! scan. [`create_inspector`] selects the variant once at startup; nothing
//! else in the crate branches on platform.

use serde::{Deserialize, Serialize};

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use self::windows::WindowsInspector;

mod generic;
pub use generic::GenericInspector;

/// Title and owning-process name of the active window. Both fields are
/// empty when unresolvable; inspection never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveWindow {
    pub title: String,
    pub app_name: String,
}

/// Contract for the active-window lookup primitive.
pub trait WindowInspector: Send + Sync {
    fn active_window(&self) -> ActiveWindow;
}

/// Select the inspector variant for the current platform.
pub fn create_inspector() -> Box<dyn WindowInspector> {
    #[cfg(target_os = "windows")]
    {
        Box::new(WindowsInspector::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(GenericInspector::new())
    }
}
