//! Report rendering.
//!
//! Each renderer consumes the final, frozen step sequence and produces one
//! self-contained artifact in the session directory. Renderers are
//! independent and order-insensitive relative to each other; a renderer
//! that reports itself unavailable is skipped with a notice, not an error.

use crate::{Result, Session, Step};
use std::path::PathBuf;

mod docx;
mod html;
mod markdown;

pub use docx::DocxRenderer;
pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;

/// A component that serializes the final step sequence into one artifact.
pub trait ReportRenderer: Send + Sync {
    /// Short name used in console notices
    fn name(&self) -> &'static str;

    /// Whether this renderer can run in the current build
    fn is_available(&self) -> bool {
        true
    }

    /// Produce the artifact and return its path.
    fn render(&self, session: &Session, steps: &[Step]) -> Result<PathBuf>;
}

/// The fixed renderer list: structured text, hypertext, page document.
pub fn renderers() -> Vec<Box<dyn ReportRenderer>> {
    vec![
        Box::new(MarkdownRenderer),
        Box::new(HtmlRenderer),
        Box::new(DocxRenderer),
    ]
}
