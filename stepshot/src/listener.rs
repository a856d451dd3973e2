use crate::{PointerButton, Position, StepAction, StepPipeline};
use rdev::{Button, EventType, Key};
use std::{
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing::{debug, error, info, warn};

/// Key that ends the session
pub const TERMINATE_KEY: Key = Key::Escape;
/// Key that records a manual screenshot
pub const MANUAL_CAPTURE_KEY: Key = Key::F9;

const CHANNEL_POLL: Duration = Duration::from_millis(200);

/// Raw pointer signal forwarded from the OS hook to the pointer listener.
enum PointerSignal {
    ButtonPress { button: Button, position: Position },
    Wheel { dx: i64, dy: i64, position: Position },
}

/// The two concurrently running input listeners plus the detached OS-hook
/// thread feeding them.
///
/// The hook callback stays cheap: it only tracks the cursor and forwards
/// signals over mpsc channels; all step-producing work happens on the two
/// listener threads. `rdev`'s listener cannot be unhooked once installed,
/// so after stop it keeps running but discards every event.
pub struct InputListeners {
    pointer_handle: JoinHandle<()>,
    keyboard_handle: JoinHandle<()>,
}

impl InputListeners {
    /// Install the OS hook and start both listener threads.
    pub fn start(pipeline: Arc<StepPipeline>) -> Self {
        let (pointer_tx, pointer_rx) = mpsc::channel::<PointerSignal>();
        let (key_tx, key_rx) = mpsc::channel::<Key>();

        let session = Arc::clone(pipeline.session());
        let hook_session = Arc::clone(&session);
        thread::spawn(move || {
            let cursor: Mutex<Option<Position>> = Mutex::new(None);
            if let Err(e) = rdev::listen(move |event| {
                if hook_session.stop_requested() {
                    return;
                }
                match event.event_type {
                    EventType::MouseMove { x, y } => {
                        if let Ok(mut cursor) = cursor.lock() {
                            *cursor = Some(Position::new(x as i32, y as i32));
                        }
                    }
                    EventType::ButtonPress(button) => {
                        let position = cursor.lock().ok().and_then(|c| *c);
                        if let Some(position) = position {
                            let _ = pointer_tx.send(PointerSignal::ButtonPress { button, position });
                        }
                    }
                    EventType::Wheel { delta_x, delta_y } => {
                        let position = cursor.lock().ok().and_then(|c| *c);
                        if let Some(position) = position {
                            let _ = pointer_tx.send(PointerSignal::Wheel {
                                dx: delta_x,
                                dy: delta_y,
                                position,
                            });
                        }
                    }
                    EventType::KeyPress(key) => {
                        let _ = key_tx.send(key);
                    }
                    // Button releases and key releases never produce steps
                    _ => {}
                }
            }) {
                error!("Failed to listen for input events: {:?}", e);
            }
            debug!("Input hook thread finished");
        });

        let pointer_pipeline = Arc::clone(&pipeline);
        let pointer_session = Arc::clone(&session);
        let pointer_handle = thread::spawn(move || {
            loop {
                if pointer_session.stop_requested() {
                    break;
                }
                let signal = match pointer_rx.recv_timeout(CHANNEL_POLL) {
                    Ok(signal) => signal,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };
                let (action, position) = match signal {
                    PointerSignal::ButtonPress { button, position } => (
                        StepAction::Click {
                            button: map_button(button),
                        },
                        position,
                    ),
                    PointerSignal::Wheel { dx, dy, position } => {
                        (StepAction::Scroll { dx, dy }, position)
                    }
                };
                if let Err(e) = pointer_pipeline.record(action, Some(position)) {
                    warn!("Step not recorded: {}", e);
                }
            }
            debug!("Pointer listener stopped");
        });

        let keyboard_handle = thread::spawn(move || {
            loop {
                if session.stop_requested() {
                    break;
                }
                let key = match key_rx.recv_timeout(CHANNEL_POLL) {
                    Ok(key) => key,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };
                match key {
                    key if key == TERMINATE_KEY => {
                        info!("Terminate key pressed, ending session");
                        session.request_stop();
                        break;
                    }
                    key if key == MANUAL_CAPTURE_KEY => {
                        if let Err(e) = pipeline.record(StepAction::ManualScreenshot, None) {
                            warn!("Manual screenshot not recorded: {}", e);
                        }
                    }
                    _ => {}
                }
            }
            debug!("Keyboard listener stopped");
        });

        Self {
            pointer_handle,
            keyboard_handle,
        }
    }

    /// Join both listener threads. The stop flag must already be set; no
    /// timeout is enforced.
    pub fn stop(self) {
        if self.pointer_handle.join().is_err() {
            error!("Pointer listener thread panicked");
        }
        if self.keyboard_handle.join().is_err() {
            error!("Keyboard listener thread panicked");
        }
    }
}

fn map_button(button: Button) -> PointerButton {
    match button {
        Button::Left => PointerButton::Left,
        Button::Right => PointerButton::Right,
        Button::Middle => PointerButton::Middle,
        Button::Unknown(code) => PointerButton::Other(code),
    }
}
