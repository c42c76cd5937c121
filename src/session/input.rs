use std::sync::mpsc;

use crate::animation::ease::Ease;
use crate::foundation::core::Viewport;

/// Asynchronous input delivered to the pipeline.
///
/// Events are buffered and applied at the start of the next frame, in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Slider-style direct assignment of the transition progress.
    SetProgress(f64),
    /// Eased animation of progress; replaces any running one.
    AnimateProgress {
        to: f64,
        delay_secs: f64,
        duration_secs: f64,
        ease: Ease,
    },
    /// Rotate the globe to a configured location, then play the transition.
    SelectLocation(usize),
    /// Pointer drag in pixels.
    Drag { dx: f32, dy: f32 },
    /// Wheel or pinch zoom; positive zooms in.
    Zoom { delta: f32 },
    Resize(Viewport),
}

/// Cloneable producer side of an [`InputQueue`]; may live on another thread.
#[derive(Clone, Debug)]
pub struct InputSender {
    tx: mpsc::Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event. Returns `false` once the pipeline is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// FIFO of pending input events, drained once per frame.
#[derive(Debug)]
pub struct InputQueue {
    tx: mpsc::Sender<InputEvent>,
    rx: mpsc::Receiver<InputEvent>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    pub fn push(&self, event: InputEvent) {
        // The queue owns a sender, so the channel can never be disconnected here.
        let _ = self.tx.send(event);
    }

    /// Take every event queued so far, oldest first.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/input.rs"]
mod tests;
