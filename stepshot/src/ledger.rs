use crate::{RecorderError, Result, Step};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::info;

/// The ordered, append-only collection of steps for a session.
///
/// All mutation is serialized behind one mutex, acquired through
/// [`StepLedger::begin_step`] and held by the returned guard for the full
/// duration of a step's construction (capture through append). Two events
/// firing near-simultaneously from the pointer and keyboard listeners can
/// therefore never interleave their side effects or receive out-of-order
/// indices.
pub struct StepLedger {
    steps: Mutex<Vec<Step>>,
    step_tx: broadcast::Sender<Step>,
}

impl StepLedger {
    pub fn new() -> Self {
        let (step_tx, _) = broadcast::channel(100);
        Self {
            steps: Mutex::new(Vec::new()),
            step_tx,
        }
    }

    /// Acquire the ledger's mutual-exclusion boundary for one step.
    ///
    /// Dropping the guard without calling [`LedgerGuard::commit`] abandons
    /// the step without consuming an index (the capture-error path).
    pub fn begin_step(&self) -> Result<LedgerGuard<'_>> {
        let steps = self
            .steps
            .lock()
            .map_err(|e| RecorderError::Ledger(format!("Ledger lock poisoned: {}", e)))?;
        Ok(LedgerGuard {
            steps,
            step_tx: &self.step_tx,
        })
    }

    /// Clone of the current step sequence, in append order.
    pub fn snapshot(&self) -> Result<Vec<Step>> {
        let steps = self
            .steps
            .lock()
            .map_err(|e| RecorderError::Ledger(format!("Ledger lock poisoned: {}", e)))?;
        Ok(steps.clone())
    }

    pub fn len(&self) -> Result<usize> {
        let steps = self
            .steps
            .lock()
            .map_err(|e| RecorderError::Ledger(format!("Ledger lock poisoned: {}", e)))?;
        Ok(steps.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Subscribe to the live step stream; every committed step is mirrored
    /// to all subscribers.
    pub fn subscribe(&self) -> broadcast::Receiver<Step> {
        self.step_tx.subscribe()
    }
}

impl Default for StepLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to the ledger for the construction of a single step.
pub struct LedgerGuard<'a> {
    steps: MutexGuard<'a, Vec<Step>>,
    step_tx: &'a broadcast::Sender<Step>,
}

impl LedgerGuard<'_> {
    /// The index the next committed step will receive (1-based).
    pub fn next_index(&self) -> u64 {
        self.steps.len() as u64 + 1
    }

    /// Append the step and release the boundary.
    ///
    /// Mirrors the step to a live console line and to the broadcast stream
    /// before the lock is released.
    pub fn commit(mut self, step: Step) -> Step {
        info!(
            "[{}] {} {} -> {} | {} ({})",
            step.timestamp,
            step.action,
            step.position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "(-)".to_string()),
            step.image_ref,
            step.window_title,
            step.app_name,
        );
        self.steps.push(step.clone());
        // Nobody listening is fine
        let _ = self.step_tx.send(step.clone());
        step
    }
}
