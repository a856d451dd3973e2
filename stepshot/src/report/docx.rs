use super::ReportRenderer;
use crate::{Result, Session, Step};
use std::path::PathBuf;

/// Page-document renderer: `action_report.docx` with a cover page and one
/// page per step. Compiled in only with the `docx` cargo feature; a
/// docx-less build reports itself unavailable and is skipped with a notice.
pub struct DocxRenderer;

impl ReportRenderer for DocxRenderer {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "docx")
    }

    #[cfg(feature = "docx")]
    fn render(&self, session: &Session, steps: &[Step]) -> Result<PathBuf> {
        imp::render(session, steps)
    }

    #[cfg(not(feature = "docx"))]
    fn render(&self, _session: &Session, _steps: &[Step]) -> Result<PathBuf> {
        Err(crate::RecorderError::Render(
            "Compiled without docx support".to_string(),
        ))
    }
}

#[cfg(feature = "docx")]
mod imp {
    use crate::{RecorderError, Result, Session, Step};
    use chrono::Local;
    use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Pic, Run};
    use std::{fs, path::PathBuf};
    use tracing::warn;

    /// Embedded image width: 6.2 inches in EMU.
    const IMAGE_WIDTH_EMU: u32 = 5_669_280;

    fn page_break() -> Paragraph {
        Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
    }

    pub(super) fn render(session: &Session, steps: &[Step]) -> Result<PathBuf> {
        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut docx = Docx::new()
            .add_paragraph(
                Paragraph::new()
                    .align(AlignmentType::Center)
                    .add_run(Run::new().add_text("Action Report").bold().size(56)),
            )
            .add_paragraph(
                Paragraph::new().align(AlignmentType::Center).add_run(
                    Run::new()
                        .add_text(format!(
                            "ID: {} - Generated at {}",
                            session.run_id(),
                            generated_at
                        ))
                        .size(24),
                ),
            )
            .add_paragraph(page_break());

        for step in steps {
            docx = docx.add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text(format!("Step {}", step.index))
                        .bold()
                        .size(32),
                ),
            );
            docx = docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text(step.timestamp.as_str())));
            if !step.window_title.is_empty() {
                docx = docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(format!("Window: {}", step.window_title))),
                );
            }
            if !step.app_name.is_empty() {
                docx = docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(format!("Application: {}", step.app_name))),
                );
            }
            let action_line = match step.position {
                Some(position) if step.action.is_click() => {
                    format!("Action: {} at {}", step.action, position)
                }
                _ => format!("Action: {}", step.action),
            };
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(action_line)));
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Observation: ______________________________")),
            );

            // A step whose image cannot be read or decoded is skipped while
            // the rest of the document still renders.
            let image_path = session.base_dir().join(&step.marked_image_ref);
            match embed_image(&image_path) {
                Ok(paragraph) => docx = docx.add_paragraph(paragraph),
                Err(e) => warn!(
                    "Skipping image for step {} in docx report: {}",
                    step.index, e
                ),
            }
            docx = docx.add_paragraph(page_break());
        }

        let path = session.base_dir().join("action_report.docx");
        let file = fs::File::create(&path)?;
        docx.build()
            .pack(file)
            .map_err(|e| RecorderError::Render(format!("Failed to pack docx: {}", e)))?;
        Ok(path)
    }

    fn embed_image(path: &std::path::Path) -> Result<Paragraph> {
        let bytes = fs::read(path)?;
        let (width, height) = image::image_dimensions(path)?;
        if width == 0 {
            return Err(RecorderError::Render(format!(
                "Zero-width image {}",
                path.display()
            )));
        }
        let height_emu = (IMAGE_WIDTH_EMU as u64 * height as u64 / width as u64) as u32;
        let pic = Pic::new(&bytes).size(IMAGE_WIDTH_EMU, height_emu);
        Ok(Paragraph::new().add_run(Run::new().add_image(pic)))
    }
}
