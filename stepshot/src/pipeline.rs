use crate::{
    Annotator, CaptureProvider, CaptureRegion, Position, Result, Session, Step, StepAction,
    WindowInspector,
};
use chrono::Local;
use std::sync::Arc;
use tracing::warn;

/// The event-to-record path: capture, window inspection, annotation, and
/// ledger append for one triggered step.
///
/// The whole path runs synchronously on whichever listener thread received
/// the triggering OS event, under the ledger's mutual-exclusion boundary.
pub struct StepPipeline {
    session: Arc<Session>,
    capture: Box<dyn CaptureProvider>,
    inspector: Box<dyn WindowInspector>,
    annotator: Annotator,
    crop_radius: u32,
}

impl StepPipeline {
    pub fn new(
        session: Arc<Session>,
        capture: Box<dyn CaptureProvider>,
        inspector: Box<dyn WindowInspector>,
        crop_radius: u32,
    ) -> Self {
        Self {
            session,
            capture,
            inspector,
            annotator: Annotator::new(),
            crop_radius,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Record one step.
    ///
    /// A capture error abandons the attempt without consuming an index; the
    /// caller logs it and the session continues. Window inspection never
    /// fails (empty strings on lookup failure) and an annotation failure
    /// falls back to the raw image reference.
    pub fn record(&self, action: StepAction, position: Option<Position>) -> Result<Step> {
        let guard = self.session.ledger().begin_step()?;

        let region = match (self.crop_radius, position) {
            (radius, Some(position)) if radius > 0 => Some(CaptureRegion::around(position, radius)),
            _ => None,
        };
        let image = self.capture.capture(region)?;

        let image_path = self.session.next_image_path("step");
        image.save(&image_path)?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image_ref = format!("images/{}", file_name);

        let window = self.inspector.active_window();

        let marked_image_ref = if action.is_click() {
            let marked_path = self.session.marked_images_dir().join(&file_name);
            match self.annotator.annotate(&image, &marked_path, position) {
                Ok(()) => format!("images_marked/{}", file_name),
                Err(e) => {
                    warn!("Annotation failed, keeping raw capture: {}", e);
                    image_ref.clone()
                }
            }
        } else {
            image_ref.clone()
        };

        let step = Step {
            index: guard.next_index(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            action,
            position,
            window_title: window.title,
            app_name: window.app_name,
            image_ref,
            marked_image_ref,
        };

        Ok(guard.commit(step))
    }
}
