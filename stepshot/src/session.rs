use crate::{RecorderError, Result, StepLedger};
use chrono::Local;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::{SystemTime, UNIX_EPOCH},
};

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Listening,
    Rendering,
    Done,
}

impl SessionPhase {
    fn can_advance_to(self, next: SessionPhase) -> bool {
        matches!(
            (self, next),
            (SessionPhase::Idle, SessionPhase::Listening)
                | (SessionPhase::Listening, SessionPhase::Rendering)
                | (SessionPhase::Rendering, SessionPhase::Done)
        )
    }
}

/// One run of the recorder, identified by a timestamp-derived run id.
///
/// The session exclusively owns the step ledger, the termination flag, and
/// the lifecycle phase; listeners and renderers receive it by reference. It
/// is mutated only by ledger appends while listening and is frozen once
/// rendering begins.
pub struct Session {
    run_id: String,
    base_dir: PathBuf,
    ledger: StepLedger,
    stop_flag: AtomicBool,
    phase: Mutex<SessionPhase>,
}

impl Session {
    /// Create a new session under `output_root`, laying out the
    /// `recording_<RUN_ID>/images` and `images_marked` directories.
    pub fn create(output_root: &Path) -> Result<Self> {
        let run_id = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::create_with_run_id(output_root, run_id)
    }

    pub(crate) fn create_with_run_id(output_root: &Path, run_id: String) -> Result<Self> {
        let base_dir = output_root.join(format!("recording_{}", run_id));
        for dir in [base_dir.join("images"), base_dir.join("images_marked")] {
            fs::create_dir_all(&dir).map_err(|e| {
                RecorderError::Initialization(format!(
                    "Failed to create output directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            run_id,
            base_dir,
            ledger: StepLedger::new(),
            stop_flag: AtomicBool::new(false),
            phase: Mutex::new(SessionPhase::Idle),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn images_dir(&self) -> PathBuf {
        self.base_dir.join("images")
    }

    pub fn marked_images_dir(&self) -> PathBuf {
        self.base_dir.join("images_marked")
    }

    pub fn ledger(&self) -> &StepLedger {
        &self.ledger
    }

    /// Reserve a fresh raw-capture path named `<prefix>_<epoch_ms>.png`.
    ///
    /// Two events inside the same millisecond would collide on the epoch
    /// name; the millisecond value is bumped until the name is free.
    pub fn next_image_path(&self, prefix: &str) -> PathBuf {
        let mut millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        loop {
            let candidate = self.images_dir().join(format!("{}_{}.png", prefix, millis));
            if !candidate.exists() {
                return candidate;
            }
            millis += 1;
        }
    }

    /// Signal cooperative termination; observed by the listeners and the
    /// main wait loop.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Advance the lifecycle. Only `Idle → Listening → Rendering → Done`
    /// transitions are allowed.
    pub fn advance(&self, next: SessionPhase) -> Result<()> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if !phase.can_advance_to(next) {
            return Err(RecorderError::InvalidPhase(format!(
                "{:?} -> {:?}",
                *phase, next
            )));
        }
        *phase = next;
        Ok(())
    }
}
