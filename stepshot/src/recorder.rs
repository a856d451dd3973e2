use crate::{
    create_inspector, renderers, InputListeners, Result, ScreenCapture, Session, SessionPhase,
    Step, StepPipeline,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio_stream::Stream;
use tracing::{error, info};

/// Fixed crop radius in pixels; 0 captures the full screen (the
/// default-tested path). A non-zero radius captures a square box of side
/// `2 * radius` centered on the event position.
pub const CROP_RADIUS: u32 = 0;

const WAIT_POLL: Duration = Duration::from_millis(200);

/// The action recorder: session lifecycle orchestration.
///
/// Drives the `Idle -> Listening -> Rendering -> Done` state machine: start
/// spawns the input listeners, the terminate key (or an external stop
/// signal) ends listening, and stop joins the listeners and runs every
/// available report renderer over the frozen step sequence.
pub struct ActionRecorder {
    session: Arc<Session>,
    listeners: Option<InputListeners>,
}

impl ActionRecorder {
    /// Create a recorder with a fresh session under `output_root`.
    pub fn new(output_root: &Path) -> Result<Self> {
        let session = Arc::new(Session::create(output_root)?);
        Ok(Self {
            session,
            listeners: None,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Get a live stream of committed steps.
    pub fn step_stream(&self) -> impl Stream<Item = Step> {
        let mut rx = self.session.ledger().subscribe();
        Box::pin(async_stream::stream! {
            while let Ok(step) = rx.recv().await {
                yield step;
            }
        })
    }

    /// Start listening for input events.
    pub async fn start(&mut self) -> Result<()> {
        self.session.advance(SessionPhase::Listening)?;

        let pipeline = Arc::new(StepPipeline::new(
            Arc::clone(&self.session),
            Box::new(ScreenCapture::new()),
            create_inspector(),
            CROP_RADIUS,
        ));
        self.listeners = Some(InputListeners::start(pipeline));

        info!(
            "Recording started. ESC to stop, F9 for a manual screenshot. Output: {}",
            self.session.base_dir().display()
        );
        Ok(())
    }

    /// Passively wait until termination is requested (terminate key or
    /// [`Session::request_stop`]).
    pub async fn wait(&self) {
        while !self.session.stop_requested() {
            tokio::time::sleep(WAIT_POLL).await;
        }
    }

    /// Stop both listeners, render every available report over the frozen
    /// step sequence, and return the produced artifact paths.
    pub async fn stop(&mut self) -> Result<Vec<PathBuf>> {
        info!("Stopping recording");
        self.session.request_stop();
        if let Some(listeners) = self.listeners.take() {
            listeners.stop();
        }

        self.session.advance(SessionPhase::Rendering)?;
        let steps = self.session.ledger().snapshot()?;
        info!("Rendering reports for {} step(s)", steps.len());

        let mut artifacts = Vec::new();
        for renderer in renderers() {
            if !renderer.is_available() {
                info!("Skipping {} report: renderer unavailable", renderer.name());
                continue;
            }
            match renderer.render(&self.session, &steps) {
                Ok(path) => {
                    info!("{} report written to {}", renderer.name(), path.display());
                    artifacts.push(path);
                }
                Err(e) => error!("{} report failed: {}", renderer.name(), e),
            }
        }

        self.session.advance(SessionPhase::Done)?;
        info!("Session finished: {}", self.session.base_dir().display());
        Ok(artifacts)
    }
}
