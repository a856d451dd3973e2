use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a position on the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the mouse button that triggered a click step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

impl fmt::Display for PointerButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerButton::Left => write!(f, "left"),
            PointerButton::Right => write!(f, "right"),
            PointerButton::Middle => write!(f, "middle"),
            PointerButton::Other(code) => write!(f, "button{}", code),
        }
    }
}

/// The kind of user action a step records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    /// A mouse button press
    Click { button: PointerButton },

    /// A mouse wheel movement, with signed line deltas
    Scroll { dx: i64, dy: i64 },

    /// A screenshot requested through the manual-capture key
    ManualScreenshot,
}

impl StepAction {
    /// Whether this action gets a locator mark drawn on its capture
    pub fn is_click(&self) -> bool {
        matches!(self, StepAction::Click { .. })
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Click { button } => write!(f, "click:{}", button),
            StepAction::Scroll { dx, dy } => write!(f, "scroll:{},{}", dx, dy),
            StepAction::ManualScreenshot => write!(f, "manual-screenshot"),
        }
    }
}

/// One recorded unit of user action plus its contextual capture.
///
/// Steps are immutable once appended to the ledger. `index` is 1-based,
/// strictly increasing, and assigned under the ledger lock; it is the sole
/// source of ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in the session ledger
    pub index: u64,

    /// Human-readable capture time (`%Y-%m-%d %H:%M:%S`)
    pub timestamp: String,

    /// What the user did
    pub action: StepAction,

    /// Cursor position at event time; absent for manual screenshots
    pub position: Option<Position>,

    /// Title of the active window, best effort (empty when unresolvable)
    pub window_title: String,

    /// Name of the process owning the active window, best effort
    pub app_name: String,

    /// Session-relative path of the raw capture (`images/<name>.png`)
    pub image_ref: String,

    /// Session-relative path of the annotated capture; equals `image_ref`
    /// when no annotation applies or annotation failed
    pub marked_image_ref: String,
}
