use super::ReportRenderer;
use crate::{Result, Session, Step};
use std::{fmt::Write as _, fs, path::PathBuf};

/// Structured-text renderer: one `steps.md` with a section per step.
///
/// Output is byte-deterministic for a given step sequence.
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn render(&self, session: &Session, steps: &[Step]) -> Result<PathBuf> {
        let mut out = String::new();
        let _ = writeln!(out, "# Action Report - {}\n", session.run_id());
        let _ = writeln!(
            out,
            "> **Tip**: fill in the *Objective/Observation* fields after the capture.\n"
        );

        for step in steps {
            let _ = writeln!(out, "## Step {}\n", step.index);
            let _ = writeln!(out, "**{}**\n", step.timestamp);
            if !step.window_title.is_empty() || !step.app_name.is_empty() {
                let window = if step.window_title.is_empty() {
                    String::new()
                } else {
                    format!("**Window:** {}", step.window_title)
                };
                let app = if step.app_name.is_empty() {
                    String::new()
                } else {
                    format!(" (app: `{}`)", step.app_name)
                };
                let _ = writeln!(out, "- {}{}", window, app);
            }
            match step.position {
                Some(position) if step.action.is_click() => {
                    let _ = writeln!(out, "- **Action:** {} at {}", step.action, position);
                }
                _ => {
                    let _ = writeln!(out, "- **Action:** {}", step.action);
                }
            }
            let _ = writeln!(out, "- **Objective/Observation:** _fill in here_\n");
            let _ = writeln!(out, "![screenshot]({})\n", step.marked_image_ref);
        }

        let path = session.base_dir().join("steps.md");
        fs::write(&path, out)?;
        Ok(path)
    }
}
